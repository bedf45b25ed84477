use crate::components::google_calendar::reminders::DEFAULT_REMINDER_MINUTES;
use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Default civil timezone for all user-facing dates
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Default completion model for summaries and meeting minutes
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Default RSS feed for the news briefing
pub const DEFAULT_NEWS_FEED_URL: &str = "https://feeds.feedburner.com/zdkorea";

/// Main configuration structure for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// OpenAI API key for summarization
    pub openai_api_key: String,
    /// Completion model identifier
    pub openai_model: String,
    /// Civil timezone for all user-facing dates (IANA name)
    pub timezone: String,
    /// Path of the persisted OAuth token cache
    pub token_cache_path: String,
    /// Path of the SQLite meeting database
    pub database_path: String,
    /// RSS feed queried by the news briefing
    pub news_feed_url: String,
    /// How many feed articles to summarize per briefing
    pub news_article_limit: usize,
    /// Default popup reminder lead time in minutes
    pub default_reminder_minutes: u32,
    /// HTTP listen port
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| env_error("OPENAI_API_KEY"))?;

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_OPENAI_MODEL));

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));
        // Reject unknown zone names now rather than on the first request
        timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", timezone)))?;

        let token_cache_path =
            env::var("TOKEN_CACHE_PATH").unwrap_or_else(|_| String::from("token.json"));
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| String::from("daybook.db"));
        let news_feed_url =
            env::var("NEWS_FEED_URL").unwrap_or_else(|_| String::from(DEFAULT_NEWS_FEED_URL));

        let news_article_limit = env::var("NEWS_ARTICLE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5);

        let default_reminder_minutes = env::var("DEFAULT_REMINDER_MINUTES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_REMINDER_MINUTES);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5005);

        Ok(Config {
            google_client_id,
            google_client_secret,
            openai_api_key,
            openai_model,
            timezone,
            token_cache_path,
            database_path,
            news_feed_url,
            news_article_limit,
            default_reminder_minutes,
            port,
        })
    }

    /// The configured civil timezone, validated at load time
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
