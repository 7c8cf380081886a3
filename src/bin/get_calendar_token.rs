use gcaltech::components::google_calendar::token::{token_from_response, CALENDAR_SCOPE, GOOGLE_TOKEN_URL};
use gcaltech::components::google_calendar::TokenManager;
use gcaltech::config::{OAuthSettings, APPLICATION_NAME};
use gcaltech::error::{auth_error, other_error, BotResult, Error};
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";
const LISTEN_ADDR: &str = "0.0.0.0:8080";

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let settings = OAuthSettings::load()?;
    let token_manager = TokenManager::new(settings.clone());

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();
    let auth_url = authorization_url(&settings.client_id, &state)?;

    // Open browser for authorization
    println!("Opening browser for {} calendar authorization...", APPLICATION_NAME);
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser, visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(LISTEN_ADDR).map_err(Error::from)?;
    println!("Waiting for authorization callback...");

    let request = server.recv().map_err(Error::from)?;
    let code = authorization_code(request.url(), &state)?;

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", settings.client_id.clone()),
            ("client_secret", settings.client_secret.clone()),
            ("code", code),
            ("redirect_uri", REDIRECT_URI.to_string()),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await
        .map_err(Error::from)?;

    if !response.status().is_success() {
        let error_text = response.text().await.map_err(Error::from)?;
        return Err(auth_error(&format!("Failed to get token: {}", error_text)).into());
    }

    let token_data: serde_json::Value = response.json().await.map_err(Error::from)?;
    let token = token_from_response(&token_data, None)?;
    token_manager.set_token(&token)?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response).map_err(Error::from)?;

    println!("Token saved to {}", settings.credential_file.display());

    Ok(())
}

fn authorization_url(client_id: &str, state: &str) -> BotResult<Url> {
    Url::parse_with_params(
        "https://accounts.google.com/o/oauth2/v2/auth",
        &[
            ("client_id", client_id),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", CALENDAR_SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))
}

/// Pull the code out of the callback path, checking `state`
fn authorization_code(callback: &str, state: &str) -> BotResult<String> {
    let url = Url::parse(REDIRECT_URI)
        .and_then(|base| base.join(callback))
        .map_err(|e| other_error(&format!("Bad callback URL {}: {}", callback, e)))?;

    let mut code = None;
    let mut returned_state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => returned_state = Some(value.into_owned()),
            "error" => return Err(auth_error(&format!("Authorization denied: {}", value))),
            _ => {}
        }
    }

    if returned_state.as_deref() != Some(state) {
        return Err(auth_error("State mismatch in authorization callback"));
    }

    code.ok_or_else(|| other_error("No authorization code found in callback"))
}
