use crate::error::{config_error, env_error, BotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name used in campaign titles, the sender name and OAuth user agent
pub const APPLICATION_NAME: &str = "gCALtech";

/// Master calendar page listing every event of the period
pub const DEFAULT_LISTING_URL: &str = "https://www.caltech.edu/campus-life-events/master-calendar/";

/// Base used to absolutize `href="/..."` references on the listing page
pub const DEFAULT_BASE_URL: &str = "http://www.caltech.edu";

/// Timezone label attached to every calendar entry
pub const DEFAULT_EVENT_TIMEZONE: &str = "America/Los_Angeles";

/// Token cache written by `get_calendar_token`
pub const DEFAULT_CREDENTIAL_FILE: &str = "gcaltech_certificate.json";

/// Optional overrides for the non-secret settings
pub const OVERRIDES_FILE: &str = "config/gcaltech.toml";

/// Runtime configuration, loaded once at startup and never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Path of the cached OAuth token
    pub credential_file: PathBuf,
    /// Calendar that receives the scraped events
    pub calendar_id: String,
    /// Mailchimp account user name
    pub mailchimp_username: String,
    /// Mailchimp API key, `<key>-<dc>`
    pub mailchimp_api_key: String,
    /// Recipient list the newsletter goes to
    pub email_list_name: String,
    /// Reply-to address of the campaign
    pub reply_email: String,
    pub listing_url: String,
    pub base_url: String,
    /// IANA timezone of the campus
    pub event_timezone: String,
    pub application_name: String,
    /// Where to drop a copy of the rendered email, if anywhere
    pub email_html_output: Option<PathBuf>,
}

/// Settings that may be overridden from `config/gcaltech.toml`
#[derive(Debug, Default, Deserialize)]
pub struct ConfigOverrides {
    pub listing_url: Option<String>,
    pub base_url: Option<String>,
    pub event_timezone: Option<String>,
    pub application_name: Option<String>,
}

/// The Google OAuth client and where its token is cached.
///
/// This is all `get_calendar_token` needs, so it loads on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub credential_file: PathBuf,
}

impl OAuthSettings {
    /// Load the OAuth client from the environment, `.env` included
    pub fn load() -> BotResult<Self> {
        dotenv().ok();

        Ok(Self {
            client_id: required("GOOGLE_CLIENT_ID")?,
            client_secret: required("GOOGLE_CLIENT_SECRET")?,
            credential_file: credential_file(),
        })
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_client_id = required("GOOGLE_CLIENT_ID")?;
        let google_client_secret = required("GOOGLE_CLIENT_SECRET")?;
        let calendar_id = required("CALENDAR_ID")?;
        let mailchimp_username = required("MAILCHIMP_USERNAME")?;
        let mailchimp_api_key = required("MAILCHIMP_API_KEY")?;
        let email_list_name = required("EMAIL_LIST_NAME")?;
        let reply_email = required("REPLY_EMAIL")?;

        let credential_file = credential_file();
        let email_html_output = env::var("EMAIL_HTML_OUTPUT").ok().map(PathBuf::from);

        let mut config = Config {
            google_client_id,
            google_client_secret,
            credential_file,
            calendar_id,
            mailchimp_username,
            mailchimp_api_key,
            email_list_name,
            reply_email,
            listing_url: env::var("LISTING_URL")
                .unwrap_or_else(|_| DEFAULT_LISTING_URL.to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            event_timezone: env::var("EVENT_TIMEZONE")
                .unwrap_or_else(|_| DEFAULT_EVENT_TIMEZONE.to_string()),
            application_name: APPLICATION_NAME.to_string(),
            email_html_output,
        };

        if Path::new(OVERRIDES_FILE).exists() {
            let content = fs::read_to_string(OVERRIDES_FILE)?;
            let overrides: ConfigOverrides = toml::from_str(&content)?;
            config.apply_overrides(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    /// Merge file overrides over the environment values
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(listing_url) = overrides.listing_url {
            self.listing_url = listing_url;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(event_timezone) = overrides.event_timezone {
            self.event_timezone = event_timezone;
        }
        if let Some(application_name) = overrides.application_name {
            self.application_name = application_name;
        }
    }

    /// Check the values that would otherwise only fail halfway through a run
    pub fn validate(&self) -> BotResult<()> {
        self.timezone()?;
        url::Url::parse(&self.listing_url)
            .map_err(|e| config_error(&format!("Invalid listing URL {}: {}", self.listing_url, e)))?;
        url::Url::parse(&self.base_url)
            .map_err(|e| config_error(&format!("Invalid base URL {}: {}", self.base_url, e)))?;
        self.mailchimp_data_center()?;
        Ok(())
    }

    /// The OAuth part of the configuration
    pub fn oauth(&self) -> OAuthSettings {
        OAuthSettings {
            client_id: self.google_client_id.clone(),
            client_secret: self.google_client_secret.clone(),
            credential_file: self.credential_file.clone(),
        }
    }

    /// Parsed event timezone
    pub fn timezone(&self) -> BotResult<Tz> {
        self.event_timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.event_timezone)))
    }

    /// Mailchimp data center, the suffix of the API key after the last dash
    pub fn mailchimp_data_center(&self) -> BotResult<&str> {
        self.mailchimp_api_key
            .rsplit_once('-')
            .map(|(_, dc)| dc)
            .filter(|dc| !dc.is_empty())
            .ok_or_else(|| config_error("MAILCHIMP_API_KEY has no data center suffix"))
    }
}

fn required(var: &str) -> BotResult<String> {
    env::var(var).map_err(|_| env_error(var))
}

fn credential_file() -> PathBuf {
    env::var("CREDENTIAL_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIAL_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            google_client_id: "id".to_string(),
            google_client_secret: "secret".to_string(),
            credential_file: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
            calendar_id: "cal@group.calendar.google.com".to_string(),
            mailchimp_username: "user".to_string(),
            mailchimp_api_key: "0123abcd-us19".to_string(),
            email_list_name: "Grads".to_string(),
            reply_email: "gsc@example.edu".to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            event_timezone: DEFAULT_EVENT_TIMEZONE.to_string(),
            application_name: APPLICATION_NAME.to_string(),
            email_html_output: None,
        }
    }

    #[test]
    fn test_data_center() {
        let mut config = config();
        assert_eq!(config.mailchimp_data_center().unwrap(), "us19");

        config.mailchimp_api_key = "nodash".to_string();
        assert!(config.mailchimp_data_center().is_err());

        config.mailchimp_api_key = "trailing-".to_string();
        assert!(config.mailchimp_data_center().is_err());
    }

    #[test]
    fn test_validate_timezone() {
        let mut config = config();
        assert!(config.validate().is_ok());

        config.event_timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(config.validate(), Err(crate::error::Error::Config(_))));
    }

    #[test]
    fn test_oauth_settings() {
        let oauth = config().oauth();
        assert_eq!(oauth.client_id, "id");
        assert_eq!(oauth.client_secret, "secret");
        assert_eq!(oauth.credential_file, PathBuf::from(DEFAULT_CREDENTIAL_FILE));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = config();
        let overrides: ConfigOverrides =
            toml::from_str("listing_url = \"https://events.example.edu/\"\napplication_name = \"Digest\"")
                .unwrap();
        config.apply_overrides(overrides);

        assert_eq!(config.listing_url, "https://events.example.edu/");
        assert_eq!(config.application_name, "Digest");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
