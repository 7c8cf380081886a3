use crate::components::google_calendar::{GoogleCalendarClient, TokenManager};
use crate::components::http::HttpFetcher;
use crate::components::mailchimp::MailchimpClient;
use crate::components::CredentialProvider;
use crate::config::Config;
use crate::error::Error;
use crate::pipeline::Newsletter;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Authorize once, then run the newsletter pipeline
pub async fn run_newsletter(config: Arc<Config>) -> miette::Result<()> {
    let token = TokenManager::new(config.oauth())
        .obtain_credential()
        .await?;

    let newsletter = Newsletter::new(
        HttpFetcher::default(),
        GoogleCalendarClient::new(token),
        MailchimpClient::from_config(&config)?,
        &config,
    )?;

    let summary = newsletter.run().await?;
    info!(
        "Published {} events and sent campaign {}",
        summary.events_published, summary.campaign_id
    );

    Ok(())
}
