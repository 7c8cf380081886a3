use crate::error::BotResult;
use async_trait::async_trait;

// Export components
pub mod feed;
pub mod google_calendar;
pub mod http;
pub mod listing;
pub mod mailchimp;
pub mod rewriter;

pub use google_calendar::models::{AccessToken, InsertedEvent, NormalizedEvent};
pub use mailchimp::models::{Campaign, CampaignContent, MailingList, NewCampaign};

/// Plain HTTP GET of a page or feed
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the body as text
    async fn fetch_text(&self, url: &str) -> BotResult<String>;
}

/// Source of the bearer token used against the calendar service
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a currently valid access token, refreshing it if needed
    async fn obtain_credential(&self) -> BotResult<AccessToken>;
}

/// The calendar service entries are written to
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Insert one event, returning the stored entry
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> BotResult<InsertedEvent>;
}

/// The bulk email service the newsletter goes out through
#[async_trait]
pub trait CampaignService: Send + Sync {
    /// All recipient lists of the account
    async fn lists(&self) -> BotResult<Vec<MailingList>>;

    /// Create a draft campaign
    async fn create_campaign(&self, campaign: &NewCampaign) -> BotResult<Campaign>;

    /// Replace the body of a campaign
    async fn set_content(&self, campaign_id: &str, content: &CampaignContent) -> BotResult<()>;

    /// Send a campaign to its recipients
    async fn send(&self, campaign_id: &str) -> BotResult<()>;
}
