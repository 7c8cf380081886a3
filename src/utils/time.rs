use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Time of day and offset given to events that only carry a date
pub const DEFAULT_EVENT_TIME: &str = "17:00:00-08:00";

/// A DTSTART/DTEND value as read from a feed, resolved to a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTime {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl FeedTime {
    /// Day of month, in the value's own offset
    pub fn day(&self) -> u32 {
        match self {
            FeedTime::Date(date) => date.day(),
            FeedTime::DateTime(dt) => dt.day(),
        }
    }

    /// The instant this value stands for once normalized
    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FeedTime::Date(_) => DateTime::parse_from_rfc3339(&normalize_event_time(self)).ok(),
            FeedTime::DateTime(dt) => Some(*dt),
        }
    }
}

/// Format a feed time as `YYYY-MM-DDTHH:MM:SS±HH:MM`.
///
/// Date-only values get [`DEFAULT_EVENT_TIME`]. Offsets are kept as found.
pub fn normalize_event_time(time: &FeedTime) -> String {
    match time {
        FeedTime::Date(date) => format!("{}T{}", date.format("%Y-%m-%d"), DEFAULT_EVENT_TIME),
        FeedTime::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
    }
}

/// Attach the offset `tz` has at a wall-clock time.
///
/// Returns `None` for times skipped by a DST jump. Repeated times take the earlier offset.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => None,
    }
}

/// Pick the end time to publish.
///
/// Feeds mark multi-day listings (and all-day events, whose DTEND is exclusive)
/// with an end on a later day of the month; those collapse onto the start, as
/// does an end before the start.
pub fn collapse_end(start: FeedTime, end: FeedTime) -> FeedTime {
    let ends_before_start = match (start.instant(), end.instant()) {
        (Some(start), Some(end)) => end < start,
        _ => false,
    };

    if end.day() > start.day() || ends_before_start {
        start
    } else {
        end
    }
}
