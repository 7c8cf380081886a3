#![allow(dead_code)]

use async_trait::async_trait;
use gcaltech::components::{
    CalendarService, Campaign, CampaignContent, CampaignService, Fetcher, InsertedEvent,
    MailingList, NewCampaign, NormalizedEvent,
};
use gcaltech::config::{Config, APPLICATION_NAME, DEFAULT_BASE_URL, DEFAULT_EVENT_TIMEZONE};
use gcaltech::error::{campaign_error, other_error, publish_error, BotResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const LISTING_URL: &str = "https://www.caltech.edu/campus-life-events/master-calendar/";
pub const LISTING_PAGE: &str = include_str!("../fixtures/listing.html");
pub const SEMINAR_FEED: &str = include_str!("../fixtures/seminar.ics");
pub const LECTURE_FEED: &str = include_str!("../fixtures/lecture.ics");

/// Feed links of the fixture page, as the scraper reports them
pub const SEMINAR_FEED_URL: &str = "webcal://www.caltech.edu/campus-life-events/calendar/seminar.ics";
pub const LECTURE_FEED_URL: &str = "http://www.caltech.edu/campus-life-events/calendar/lecture.ics";

/// Build an iCalendar document with CRLF line endings
pub fn ics(lines: &[&str]) -> String {
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// Configuration for tests, no environment involved
pub fn test_config() -> Config {
    Config {
        google_client_id: "test_client_id".to_string(),
        google_client_secret: "test_client_secret".to_string(),
        credential_file: PathBuf::from("test_token.json"),
        calendar_id: "test_calendar_id".to_string(),
        mailchimp_username: "test_user".to_string(),
        mailchimp_api_key: "test_key-us19".to_string(),
        email_list_name: "Grad Students".to_string(),
        reply_email: "gsc@example.edu".to_string(),
        listing_url: LISTING_URL.to_string(),
        base_url: DEFAULT_BASE_URL.to_string(),
        event_timezone: DEFAULT_EVENT_TIMEZONE.to_string(),
        application_name: APPLICATION_NAME.to_string(),
        email_html_output: None,
    }
}

/// Serves canned pages and records every request
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            ),
            requests: Arc::default(),
        }
    }

    /// The fixture listing page and both of its feeds
    pub fn fixture_site() -> Self {
        Self::new(&[
            (LISTING_URL, LISTING_PAGE),
            (
                "http://www.caltech.edu/campus-life-events/calendar/seminar.ics",
                SEMINAR_FEED,
            ),
            (LECTURE_FEED_URL, LECTURE_FEED),
        ])
    }

    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> BotResult<String> {
        self.requests.lock().await.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| other_error(&format!("Failed to fetch {}: HTTP 404 Not Found", url)))
    }
}

/// Mock implementation of the Google Calendar API
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    inserted: Arc<Mutex<Vec<(String, NormalizedEvent)>>>,
    reject: bool,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// A calendar that refuses every insert
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub async fn inserted(&self) -> Vec<(String, NormalizedEvent)> {
        self.inserted.lock().await.clone()
    }
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> BotResult<InsertedEvent> {
        if self.reject {
            return Err(publish_error("calendar access denied: HTTP 403 Forbidden"));
        }

        let mut inserted = self.inserted.lock().await;
        inserted.push((calendar_id.to_string(), event.clone()));
        let id = format!("evt{}", inserted.len());

        Ok(InsertedEvent {
            html_link: Some(format!("https://calendar.google.com/event?eid={}", id)),
            id: Some(id),
        })
    }
}

/// Calls made against [`MockCampaigns`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignCall {
    Lists,
    Create(NewCampaign),
    SetContent(String, CampaignContent),
    Send(String),
}

/// Mock implementation of the Mailchimp API
#[derive(Debug, Clone, Default)]
pub struct MockCampaigns {
    lists: Vec<MailingList>,
    calls: Arc<Mutex<Vec<CampaignCall>>>,
    fail_send: bool,
}

impl MockCampaigns {
    pub fn with_lists(names: &[&str]) -> Self {
        Self {
            lists: names
                .iter()
                .enumerate()
                .map(|(i, name)| MailingList {
                    id: format!("list{}", i + 1),
                    name: name.to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub async fn calls(&self) -> Vec<CampaignCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CampaignService for MockCampaigns {
    async fn lists(&self) -> BotResult<Vec<MailingList>> {
        self.calls.lock().await.push(CampaignCall::Lists);
        Ok(self.lists.clone())
    }

    async fn create_campaign(&self, campaign: &NewCampaign) -> BotResult<Campaign> {
        self.calls
            .lock()
            .await
            .push(CampaignCall::Create(campaign.clone()));
        Ok(Campaign {
            id: "campaign1".to_string(),
        })
    }

    async fn set_content(&self, campaign_id: &str, content: &CampaignContent) -> BotResult<()> {
        self.calls
            .lock()
            .await
            .push(CampaignCall::SetContent(campaign_id.to_string(), content.clone()));
        Ok(())
    }

    async fn send(&self, campaign_id: &str) -> BotResult<()> {
        self.calls
            .lock()
            .await
            .push(CampaignCall::Send(campaign_id.to_string()));
        if self.fail_send {
            return Err(campaign_error("Failed to send campaign: HTTP 400 Bad Request"));
        }
        Ok(())
    }
}
