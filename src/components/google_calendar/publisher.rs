use super::models::NormalizedEvent;
use crate::components::CalendarService;
use crate::error::{publish_error, BotResult};
use tracing::info;

/// Writes scraped events to the target calendar
pub struct CalendarPublisher<C> {
    service: C,
    calendar_id: String,
}

impl<C: CalendarService> CalendarPublisher<C> {
    pub fn new(service: C, calendar_id: impl Into<String>) -> Self {
        Self {
            service,
            calendar_id: calendar_id.into(),
        }
    }

    /// Insert `event` and return its calendar link.
    ///
    /// Every call creates a new entry, publishing the same event twice duplicates it.
    pub async fn publish(&self, event: &NormalizedEvent) -> BotResult<String> {
        let inserted = self.service.insert_event(&self.calendar_id, event).await?;

        let link = inserted
            .html_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| publish_error("Inserted event has no htmlLink"))?;

        info!("Created new gcal event: {}", link);
        Ok(link)
    }

    pub fn service(&self) -> &C {
        &self.service
    }
}
