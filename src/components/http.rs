use super::Fetcher;
use crate::error::{other_error, BotResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// [`Fetcher`] backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> BotResult<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(other_error(&format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}
