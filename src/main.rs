use gcaltech::startup;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting gCALtech");

    // Load configuration
    let config = startup::load_config()?;

    // Scrape, publish and mail
    startup::run_newsletter(config).await
}
