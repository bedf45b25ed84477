use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{error_response, AppState};
use crate::components::news::fetch_and_summarize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummarizeQuery {
    pub rss: Option<String>,
}

/// Handler for the news digest. Fetches the feed (the configured default
/// or one supplied through `?rss=`), summarizes each article and returns
/// the assembled digest text.
pub async fn summarize_handler(
    State(state): State<AppState>,
    Query(query): Query<SummarizeQuery>,
) -> impl IntoResponse {
    let (feed_url, limit) = {
        let config = state.config.read().await;
        (
            query.rss.unwrap_or_else(|| config.news_feed_url.clone()),
            config.news_article_limit,
        )
    };

    info!("Summarizing news feed {}", feed_url);
    match fetch_and_summarize(&state.http, &state.summarizer, &feed_url, limit).await {
        Ok(digest) => Json(json!({ "summary": digest })).into_response(),
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}
