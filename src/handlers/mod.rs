mod calendar;
mod meetings;
mod news;

pub use calendar::{
    create_event_handler, delete_event_handler, event_details_handler, list_calendars_handler,
    today_handler, update_event_handler,
};
pub use meetings::{
    delete_meeting_handler, get_meeting_handler, list_meetings_handler,
    process_meeting_notes_handler, save_meeting_notes_handler,
};
pub use news::summarize_handler;

use crate::components::google_calendar::GoogleCalendarHandle;
use crate::components::meeting_store::MeetingStore;
use crate::components::summarizer::Summarizer;
use crate::config::Config;
use crate::error::Error;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared per-request state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub calendar: GoogleCalendarHandle,
    pub store: Arc<dyn MeetingStore>,
    pub summarizer: Arc<Summarizer>,
    pub http: reqwest::Client,
}

/// Map an application error to its HTTP status and JSON body.
/// Validation problems are 400, missing records 404, the rest 500.
pub(crate) fn error_response(error: &Error) -> (StatusCode, Json<Value>) {
    let status = match error {
        Error::Validation(_) | Error::EmptyInput | Error::MalformedTimestamp(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = match error {
        Error::Completion { kind, message } => json!({
            "status": "error",
            "message": kind.hint(),
            "detail": message,
        }),
        _ => json!({
            "status": "error",
            "message": error.to_string(),
        }),
    };

    (status, Json(body))
}

/// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Handler for the service index
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "name": "daybook",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
