use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Listing page error: {0}")]
    #[diagnostic(
        code(gcaltech::scrape),
        help("the calendar page markup probably changed")
    )]
    Scrape(String),

    #[error("Event feed error: {0}")]
    #[diagnostic(code(gcaltech::extraction))]
    Extraction(String),

    #[error("Google Calendar insert failed: {0}")]
    #[diagnostic(code(gcaltech::publish))]
    Publish(String),

    #[error("Lookup error: {0}")]
    #[diagnostic(code(gcaltech::lookup))]
    Lookup(String),

    #[error("Mailchimp API error: {0}")]
    #[diagnostic(code(gcaltech::campaign))]
    Campaign(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(gcaltech::auth),
        help("run `get_calendar_token` to authorize the calendar account")
    )]
    Auth(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(gcaltech::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gcaltech::config))]
    Config(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(gcaltech::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(gcaltech::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gcaltech::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(gcaltech::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// tiny_http hands back boxed errors
impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create listing page errors
pub fn scrape_error(message: &str) -> Error {
    Error::Scrape(message.to_string())
}

/// Helper to create feed extraction errors
pub fn extraction_error(message: &str) -> Error {
    Error::Extraction(message.to_string())
}

/// Helper to create calendar insert errors
pub fn publish_error(message: &str) -> Error {
    Error::Publish(message.to_string())
}

/// Helper to create lookup errors
pub fn lookup_error(message: &str) -> Error {
    Error::Lookup(message.to_string())
}

/// Helper to create Mailchimp errors
pub fn campaign_error(message: &str) -> Error {
    Error::Campaign(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
