use super::models::{AccessToken, InsertedEvent, NormalizedEvent};
use crate::components::CalendarService;
use crate::error::{publish_error, BotResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// Calendar API v3 root
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar REST client
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_base: String,
    token: AccessToken,
}

impl GoogleCalendarClient {
    /// Create a client authorized with `token`
    pub fn new(token: AccessToken) -> Self {
        Self {
            client: Client::new(),
            api_base: GOOGLE_CALENDAR_API.to_string(),
            token,
        }
    }

    /// Point the client at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn events_url(&self, calendar_id: &str) -> BotResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| publish_error(&format!("Failed to parse URL: {}", e)))?;

        // the calendar id is usually an email address, push it as one escaped segment
        url.path_segments_mut()
            .map_err(|_| publish_error("Calendar API base cannot be a base URL"))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);

        Ok(url)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> BotResult<InsertedEvent> {
        let url = self.events_url(calendar_id)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.as_str())
            .json(event)
            .send()
            .await
            .map_err(|e| publish_error(&format!("Failed to insert event: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            let reason = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "calendar access denied",
                StatusCode::BAD_REQUEST => "event rejected",
                _ => "unexpected response",
            };
            return Err(publish_error(&format!(
                "{}: HTTP {} - {}",
                reason, status, error_body
            )));
        }

        response
            .json::<InsertedEvent>()
            .await
            .map_err(|e| publish_error(&format!("Failed to parse insert response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_escapes_calendar_id() {
        let client = GoogleCalendarClient::new(AccessToken("t".to_string()));
        let url = client.events_url("abc#def@group.calendar.google.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/abc%23def@group.calendar.google.com/events"
        );
    }
}
