use super::models::{Campaign, CampaignContent, ListsPage, MailingList, NewCampaign};
use crate::components::CampaignService;
use crate::config::Config;
use crate::error::{campaign_error, BotResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

/// Lists fetched per page
const LISTS_PAGE_SIZE: usize = 1000;

/// Mailchimp Marketing API 3.0 client
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    client: Client,
    api_base: String,
    username: String,
    api_key: String,
}

impl MailchimpClient {
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for the account's data center
    pub fn from_config(config: &Config) -> BotResult<Self> {
        let api_base = format!("https://{}.api.mailchimp.com/3.0", config.mailchimp_data_center()?);
        Ok(Self::new(
            api_base,
            config.mailchimp_username.clone(),
            config.mailchimp_api_key.clone(),
        ))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .basic_auth(&self.username, Some(&self.api_key))
    }

    async fn execute(&self, request: RequestBuilder, what: &str) -> BotResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| campaign_error(&format!("Failed to {}: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(campaign_error(&format!(
                "Failed to {}: HTTP {} - {}",
                what, status, error_body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl CampaignService for MailchimpClient {
    async fn lists(&self) -> BotResult<Vec<MailingList>> {
        let mut lists = Vec::new();

        loop {
            let request = self.request(reqwest::Method::GET, "/lists").query(&[
                ("fields", "lists.name,lists.id,total_items".to_string()),
                ("count", LISTS_PAGE_SIZE.to_string()),
                ("offset", lists.len().to_string()),
            ]);
            let page: ListsPage = self
                .execute(request, "list audiences")
                .await?
                .json()
                .await
                .map_err(|e| campaign_error(&format!("Failed to parse lists: {}", e)))?;

            let fetched = page.lists.len();
            lists.extend(page.lists);

            let total = page.total_items.unwrap_or(lists.len());
            if fetched == 0 || lists.len() >= total {
                break;
            }
        }

        debug!("Account has {} lists", lists.len());
        Ok(lists)
    }

    async fn create_campaign(&self, campaign: &NewCampaign) -> BotResult<Campaign> {
        let request = self.request(reqwest::Method::POST, "/campaigns").json(campaign);
        self.execute(request, "create campaign")
            .await?
            .json()
            .await
            .map_err(|e| campaign_error(&format!("Failed to parse campaign: {}", e)))
    }

    async fn set_content(&self, campaign_id: &str, content: &CampaignContent) -> BotResult<()> {
        let request = self
            .request(
                reqwest::Method::PUT,
                &format!("/campaigns/{}/content", campaign_id),
            )
            .json(content);
        self.execute(request, "set campaign content").await?;
        Ok(())
    }

    async fn send(&self, campaign_id: &str) -> BotResult<()> {
        let request = self.request(
            reqwest::Method::POST,
            &format!("/campaigns/{}/actions/send", campaign_id),
        );
        self.execute(request, "send campaign").await?;
        Ok(())
    }
}
