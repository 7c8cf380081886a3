//! Per-event iCalendar feeds linked from the listing page.
//!
//! Each feed holds one VEVENT. It is turned into the body we insert into the
//! calendar, with location and description folded into the fields the email
//! template shows.

use crate::components::google_calendar::models::{EventDateTime, NormalizedEvent};
use crate::components::Fetcher;
use crate::error::{extraction_error, BotResult};
use crate::utils::time::{collapse_end, localize, normalize_event_time, FeedTime};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use icalendar::parser::{read_calendar, unfold, Component};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::debug;

/// Value used for a missing SUMMARY, DESCRIPTION or LOCATION
const MISSING_TEXT: &str = " ";

/// Fetches feeds and extracts their event
pub struct FeedReader<F> {
    fetcher: F,
    timezone: Tz,
}

impl<F: Fetcher> FeedReader<F> {
    pub fn new(fetcher: F, timezone: Tz) -> Self {
        Self { fetcher, timezone }
    }

    /// Fetch the feed behind a listing link and extract its event
    pub async fn read(&self, feed_url: &str) -> BotResult<NormalizedEvent> {
        let url = feed_fetch_url(feed_url);
        debug!("Fetching event feed {}", url);
        let feed = self.fetcher.fetch_text(&url).await?;
        extract_event(&feed, self.timezone)
    }

}

/// URL to GET for a feed link; `webcal://` is served over plain HTTP
pub fn feed_fetch_url(feed_url: &str) -> String {
    // only the scheme is lowercased, feed paths are case-sensitive
    const WEBCAL: &str = "webcal://";
    match feed_url.get(..WEBCAL.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(WEBCAL) => {
            format!("http://{}", &feed_url[WEBCAL.len()..])
        }
        _ => feed_url.to_string(),
    }
}

/// Extract the event of a feed.
///
/// Floating times are read in `timezone`, which is also the label put on the
/// start and end.
pub fn extract_event(feed: &str, timezone: Tz) -> BotResult<NormalizedEvent> {
    let unfolded = unfold(feed);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| extraction_error(&format!("Failed to parse feed: {}", e)))?;

    let event = find_event(&calendar.components)
        .ok_or_else(|| extraction_error("No VEVENT component found in feed"))?;

    let summary = text_property(event, "SUMMARY");
    let description = text_property(event, "DESCRIPTION");
    let location = text_property(event, "LOCATION");

    let start = time_property(event, "DTSTART", timezone)?;
    let end = collapse_end(start, time_property(event, "DTEND", timezone)?);

    let time_zone = timezone.name().to_string();
    Ok(NormalizedEvent {
        summary: format!("{} - {}", summary, location),
        location: format!("{} === {}", location, description),
        description,
        start: EventDateTime {
            date_time: normalize_event_time(&start),
            time_zone: time_zone.clone(),
        },
        end: EventDateTime {
            date_time: normalize_event_time(&end),
            time_zone,
        },
    })
}

/// Depth-first search for the first VEVENT
fn find_event<'a, 'b>(components: &'b [Component<'a>]) -> Option<&'b Component<'a>> {
    components.iter().find_map(|component| {
        if component.name == "VEVENT" {
            Some(component)
        } else {
            find_event(&component.components)
        }
    })
}

fn text_property(event: &Component<'_>, name: &str) -> String {
    event
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| MISSING_TEXT.to_string())
}

fn time_property(event: &Component<'_>, name: &str, timezone: Tz) -> BotResult<FeedTime> {
    let prop = event
        .find_prop(name)
        .ok_or_else(|| extraction_error(&format!("Event has no {}", name)))?;

    let value = DatePerhapsTime::try_from(prop)
        .map_err(|_| extraction_error(&format!("Unreadable {}: {}", name, prop.val.as_ref())))?;

    match value {
        DatePerhapsTime::Date(date) => Ok(FeedTime::Date(date)),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            Ok(FeedTime::DateTime(dt.fixed_offset()))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            in_zone(naive, timezone, name)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let zone = tzid.parse::<Tz>().unwrap_or_else(|_| {
                debug!("Unknown TZID {}, reading {} in {}", tzid, name, timezone);
                timezone
            });
            in_zone(date_time, zone, name)
        }
    }
}

fn in_zone(naive: NaiveDateTime, zone: Tz, name: &str) -> BotResult<FeedTime> {
    localize(naive, zone).map(FeedTime::DateTime).ok_or_else(|| {
        extraction_error(&format!("{} {} does not exist in {}", name, naive, zone))
    })
}

/// Undo RFC 5545 TEXT escaping
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
