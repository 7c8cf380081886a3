use super::models::{CampaignContent, CampaignSettings, NewCampaign, Recipients};
use crate::components::CampaignService;
use crate::error::{lookup_error, BotResult};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Appended to the subject line
const SUBJECT_SUFFIX: &str = "\u{1F48C}\u{1F4C5}\u{1F389}";

/// Sender settings shared by every campaign of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignProfile {
    /// Title prefix and sender name
    pub application_name: String,
    pub reply_to: String,
    /// Page linked from the plain-text version
    pub listing_url: String,
}

/// Creates and sends the newsletter campaign
pub struct CampaignPublisher<M> {
    service: M,
    profile: CampaignProfile,
}

impl<M: CampaignService> CampaignPublisher<M> {
    pub fn new(service: M, profile: CampaignProfile) -> Self {
        Self { service, profile }
    }

    /// Id of the list called exactly `list_name`
    pub async fn list_id(&self, list_name: &str) -> BotResult<String> {
        let list = self
            .service
            .lists()
            .await?
            .into_iter()
            .find(|list| list.name == list_name)
            .ok_or_else(|| {
                lookup_error(&format!("Failed to find list with name `{}`", list_name))
            })?;

        debug!("Found ID for list `{}`: {}", list_name, list.id);
        Ok(list.id)
    }

    /// Campaign body for the day's newsletter
    pub fn new_campaign(&self, list_id: &str, today: NaiveDate) -> NewCampaign {
        let title = format!("{} {}", self.profile.application_name, today.format("%Y-%m-%d"));
        NewCampaign {
            campaign_type: "regular".to_string(),
            recipients: Recipients {
                list_id: list_id.to_string(),
            },
            settings: CampaignSettings {
                subject_line: format!("{} {}", title, SUBJECT_SUFFIX),
                title,
                from_name: self.profile.application_name.clone(),
                reply_to: self.profile.reply_to.clone(),
            },
        }
    }

    /// Email body with its plain-text fallback
    pub fn content(&self, html: &str) -> CampaignContent {
        CampaignContent {
            html: html.to_string(),
            plain_text: format!(
                "For plain_text content, please view the master calendar: {}",
                self.profile.listing_url
            ),
        }
    }

    /// Look up the list, create the campaign, fill it and send it.
    ///
    /// Returns the campaign id. Nothing is created when the list is missing.
    pub async fn publish(&self, list_name: &str, html: &str, today: NaiveDate) -> BotResult<String> {
        let list_id = self.list_id(list_name).await?;

        let campaign = self
            .service
            .create_campaign(&self.new_campaign(&list_id, today))
            .await?;
        info!("Created new campaign with ID {}", campaign.id);

        self.service
            .set_content(&campaign.id, &self.content(html))
            .await?;

        self.service.send(&campaign.id).await?;
        info!(
            "Successfully sent new email campaign {} to list {}.",
            campaign.id, list_name
        );

        Ok(campaign.id)
    }

    pub fn service(&self) -> &M {
        &self.service
    }
}
