use daybook::components::google_calendar::token::{StoredToken, TokenManager};
use daybook::config::Config;
use daybook::error::{other_error, AppResult};
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;
    let cache_path = config.token_cache_path.clone();
    let config = Arc::new(RwLock::new(config));

    // Create token manager backed by the configured cache file
    let token_manager = TokenManager::new(config.clone(), &cache_path);

    // Get client ID and secret
    let client_id = config.read().await.google_client_id.clone();
    let client_secret = config.read().await.google_client_secret.clone();

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?\
        client_id={}&\
        redirect_uri=http://localhost:8080&\
        response_type=code&\
        access_type=offline&\
        prompt=consent&\
        scope=https://www.googleapis.com/auth/calendar%20https://www.googleapis.com/auth/calendar.readonly&\
        state={}",
        client_id, state
    );

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    webbrowser::open(&auth_url)?;

    // Start local server to receive the callback
    let server = tiny_http::Server::http("0.0.0.0:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server
        .recv()
        .map_err(|e| other_error(&format!("Failed to receive callback: {}", e)))?;
    let url = request.url().to_string();

    // Parse the authorization code from the URL
    let code = url
        .split("code=")
        .nth(1)
        .and_then(|s| s.split('&').next())
        .ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let token_url = "https://oauth2.googleapis.com/token";
    let client = reqwest::Client::new();

    let response = client
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code.to_string()),
            ("redirect_uri", "http://localhost:8080".to_string()),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await
        .map_err(|e| other_error(&format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response
            .text()
            .await
            .map_err(|e| other_error(&format!("Failed to read error response: {}", e)))?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| other_error(&format!("Failed to parse token response: {}", e)))?;

    let access_token = token_data
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| other_error("Token response is missing access_token"))?
        .to_string();
    let refresh_token = token_data
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| other_error("Token response is missing refresh_token"))?
        .to_string();
    let expires_in = token_data
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);

    let token = StoredToken {
        access_token,
        refresh_token,
        expires_at: chrono::Utc::now().timestamp() + expires_in,
    };

    // Save token to the cache file
    token_manager.store(&token).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request
        .respond(response)
        .map_err(|e| other_error(&format!("Failed to answer callback: {}", e)))?;

    println!("Token successfully saved to {}", cache_path);

    Ok(())
}
