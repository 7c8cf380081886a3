mod common;

use common::test_config;
use gcaltech::components::mailchimp::MailchimpClient;
use gcaltech::components::rewriter::HtmlRewriter;
use gcaltech::config::{ConfigOverrides, OAuthSettings, DEFAULT_LISTING_URL};
use std::path::PathBuf;
use gcaltech::error::Error;

#[test]
fn test_config_validates() {
    let config = test_config();
    assert!(config.validate().is_ok());
    assert_eq!(config.timezone().unwrap(), chrono_tz::America::Los_Angeles);
    assert_eq!(config.mailchimp_data_center().unwrap(), "us19");
}

#[test]
fn test_key_without_data_center() {
    let mut config = test_config();
    config.mailchimp_api_key = "nodatacenter".to_string();

    assert!(matches!(config.validate(), Err(Error::Config(_))));
    assert!(MailchimpClient::from_config(&config).is_err());
}

#[test]
fn test_overrides_from_toml() {
    let overrides: ConfigOverrides = toml::from_str(
        r#"
        listing_url = "https://www.caltech.edu/campus-life-events/master-calendar/?week=2"
        event_timezone = "America/Denver"
        "#,
    )
    .unwrap();

    let mut config = test_config();
    config.apply_overrides(overrides);

    assert!(config.listing_url.ends_with("?week=2"));
    assert_eq!(config.event_timezone, "America/Denver");
    assert_eq!(config.application_name, "gCALtech");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_listing_url() {
    let mut config = test_config();
    config.listing_url = "not a url".to_string();
    assert!(matches!(config.validate(), Err(Error::Config(_))));

    config.listing_url = DEFAULT_LISTING_URL.to_string();
    config.base_url = "www.caltech.edu".to_string();
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn test_canonical_rewriter_builds() {
    let rewriter = HtmlRewriter::canonical().unwrap();
    assert_eq!(rewriter.rules().len(), 7);
}

#[test]
fn test_oauth_settings_need_only_google_client() {
    // the only test in this binary that touches the environment
    std::env::set_var("GOOGLE_CLIENT_ID", "env_client_id");
    std::env::set_var("GOOGLE_CLIENT_SECRET", "env_client_secret");
    std::env::set_var("CREDENTIAL_FILE", "tokens/calendar.json");
    for var in [
        "CALENDAR_ID",
        "MAILCHIMP_USERNAME",
        "MAILCHIMP_API_KEY",
        "EMAIL_LIST_NAME",
        "REPLY_EMAIL",
    ] {
        std::env::remove_var(var);
    }

    let settings = OAuthSettings::load().unwrap();
    assert_eq!(settings.client_id, "env_client_id");
    assert_eq!(settings.client_secret, "env_client_secret");
    assert_eq!(settings.credential_file, PathBuf::from("tokens/calendar.json"));
}
