use daybook::config::Config;
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    Config {
        google_client_id: String::new(),
        google_client_secret: String::new(),
        openai_api_key: "test_openai_api_key".to_string(),
        openai_model: "gpt-3.5-turbo".to_string(),
        timezone: "Asia/Seoul".to_string(),
        token_cache_path: "token.json".to_string(),
        database_path: ":memory:".to_string(),
        news_feed_url: "https://feeds.feedburner.com/zdkorea".to_string(),
        news_article_limit: 5,
        default_reminder_minutes: 10,
        port: 5005,
    }
}

/// Smoke test to verify the config holds together
#[tokio::test]
async fn test_config_construction() {
    let config = test_config();

    assert_eq!(config.timezone, "Asia/Seoul");
    assert_eq!(config.default_reminder_minutes, 10);
    assert!(config.google_client_id.is_empty());
}

/// The civil timezone parses to a real tz database entry
#[tokio::test]
async fn test_config_timezone_parses() {
    let config = test_config();
    assert_eq!(config.tz(), chrono_tz::Asia::Seoul);
}

/// A broken timezone string falls back to UTC instead of failing requests
#[tokio::test]
async fn test_config_timezone_fallback() {
    let mut config = test_config();
    config.timezone = "Mars/Olympus_Mons".to_string();
    assert_eq!(config.tz(), chrono_tz::UTC);
}

/// Test reading the shared config through Arc and RwLock
#[tokio::test]
async fn test_config_shared_read() {
    let config = Arc::new(RwLock::new(test_config()));

    let model = {
        let config_guard = config.read().await;
        config_guard.openai_model.clone()
    };

    assert_eq!(model, "gpt-3.5-turbo");
}
