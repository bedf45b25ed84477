use crate::config::Config;
use crate::error::{calendar_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Google OAuth token endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh this many seconds before the recorded expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The persisted token cache, read and written whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp after which the access token is no longer valid
    pub expires_at: i64,
}

impl StoredToken {
    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp() + EXPIRY_MARGIN_SECS
    }
}

/// Shape of a refresh-grant response from the token endpoint
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Manages the file-backed OAuth credential shared by all calendar calls.
///
/// Refresh is serialized behind a mutex so concurrent requests hitting an
/// expired token perform a single refresh instead of racing the endpoint.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    cache_path: PathBuf,
    client: Client,
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            cache_path: cache_path.into(),
            client: Client::new(),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get a valid access token, refreshing the cached credential if expired
    pub async fn access_token(&self) -> AppResult<String> {
        let _guard = self.refresh_lock.lock().await;

        let token = self.read_cache()?;
        if !token.is_expired() {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh(&token).await?;
        Ok(refreshed.access_token)
    }

    /// Persist a freshly obtained token (used by the authorization helper)
    pub async fn store(&self, token: &StoredToken) -> AppResult<()> {
        self.write_cache(token)
    }

    fn read_cache(&self) -> AppResult<StoredToken> {
        let raw = std::fs::read_to_string(&self.cache_path).map_err(|_| {
            calendar_error(&format!(
                "No token cache at {}. Run the get_calendar_token helper first.",
                self.cache_path.display()
            ))
        })?;

        serde_json::from_str(&raw)
            .map_err(|e| calendar_error(&format!("Failed to parse token cache: {}", e)))
    }

    fn write_cache(&self, token: &StoredToken) -> AppResult<()> {
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.cache_path, json)
            .map_err(|e| calendar_error(&format!("Failed to write token cache: {}", e)))?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token and persist it
    async fn refresh(&self, token: &StoredToken) -> AppResult<StoredToken> {
        let (client_id, client_secret) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
            )
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", token.refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_in = refreshed.expires_in.unwrap_or(3600);
        let new_token = StoredToken {
            access_token: refreshed.access_token,
            refresh_token: token.refresh_token.clone(),
            expires_at: Utc::now().timestamp() + expires_in,
        };

        self.write_cache(&new_token)?;
        Ok(new_token)
    }
}
