use super::models::{AccessToken, StoredToken};
use crate::components::CredentialProvider;
use crate::config::OAuthSettings;
use crate::error::{auth_error, BotResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::fs;
use tracing::{debug, info};

/// Google OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope requested by `get_calendar_token`
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Tokens this close to expiry are refreshed up front
const EXPIRY_MARGIN_SECS: i64 = 60;

/// File-backed OAuth token cache with refresh
#[derive(Clone)]
pub struct TokenManager {
    settings: OAuthSettings,
    token_url: String,
    client: Client,
}

impl TokenManager {
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Use a different token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Get OAuth token, either from the token file or by refreshing it
    pub async fn get_token(&self) -> BotResult<StoredToken> {
        let token = self.read_token()?.ok_or_else(|| {
            auth_error(&format!(
                "No token found at {}",
                self.settings.credential_file.display()
            ))
        })?;

        match token.expires_at {
            Some(expires_at) if expires_at - EXPIRY_MARGIN_SECS <= Utc::now().timestamp() => {
                debug!("Cached token expired at {}, refreshing", expires_at);
                self.refresh_token(&token).await
            }
            _ => Ok(token),
        }
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> BotResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.settings.client_id.clone()),
            ("client_secret", self.settings.client_secret.clone()),
            ("refresh_token", refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        // Google only sends a refresh token on the first exchange
        let token = token_from_response(&new_token, Some(refresh_token))?;
        self.set_token(&token)?;
        info!("Refreshed calendar token");

        Ok(token)
    }

    fn read_token(&self) -> BotResult<Option<StoredToken>> {
        let path = &self.settings.credential_file;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let token = serde_json::from_str(&content)
            .map_err(|e| auth_error(&format!("Failed to parse token file: {}", e)))?;
        Ok(Some(token))
    }

    /// Write the token file
    pub fn set_token(&self, token: &StoredToken) -> BotResult<()> {
        let path = &self.settings.credential_file;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(token)?)?;
        info!("Stored credentials to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for TokenManager {
    async fn obtain_credential(&self) -> BotResult<AccessToken> {
        let token = self.get_token().await?;
        Ok(AccessToken(token.access_token))
    }
}

/// Build a [`StoredToken`] from a token endpoint response.
///
/// `refresh_token` is used when the response carries none.
pub fn token_from_response(
    response: &Value,
    refresh_token: Option<String>,
) -> BotResult<StoredToken> {
    let access_token = response
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?
        .to_string();

    let refresh_token = response
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or(refresh_token);

    // Calculate expiry
    let expires_in = response
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);

    Ok(StoredToken {
        access_token,
        refresh_token,
        expires_at: Some(Utc::now().timestamp() + expires_in),
    })
}
