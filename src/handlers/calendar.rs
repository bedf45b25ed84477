use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::{error_response, AppState};
use crate::components::google_calendar::models::{EventDraft, EventPatch};
use crate::components::google_calendar::{CalendarListEntry, TodayAgenda, NO_EVENTS_TODAY};

/// Handler for today's agenda. An empty day answers the sentinel message
/// alongside an empty event list rather than failing or returning bare `[]`.
pub async fn today_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.calendar.list_today().await {
        Ok(TodayAgenda::Events(events)) => Json(json!({ "events": events })).into_response(),
        Ok(TodayAgenda::Empty) => Json(json!({
            "events": [],
            "message": NO_EVENTS_TODAY,
        }))
        .into_response(),
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

/// Handler for the write-capable calendar list. A provider failure degrades
/// to an empty list so the page still renders; the failure is logged.
pub async fn list_calendars_handler(State(state): State<AppState>) -> Json<Vec<CalendarListEntry>> {
    match state.calendar.list_calendars().await {
        Ok(calendars) => Json(calendars),
        Err(e) => {
            warn!("Failed to fetch calendar list: {}", e);
            Json(Vec::new())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateEventRequest {
    pub calendar_id: Option<String>,
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub reminder_minutes: Option<u32>,
}

/// Handler for event creation. Required fields are checked before any
/// provider call; the outcome always carries an explicit success flag.
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> impl IntoResponse {
    let mut missing = Vec::new();
    if request.title.as_deref().unwrap_or("").is_empty() {
        missing.push("title");
    }
    if request.start_time.as_deref().unwrap_or("").is_empty() {
        missing.push("start_time");
    }
    if request.end_time.as_deref().unwrap_or("").is_empty() {
        missing.push("end_time");
    }
    if !missing.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": format!("Missing required fields: {}", missing.join(", ")),
            })),
        )
            .into_response();
    }

    let default_minutes = state.config.read().await.default_reminder_minutes;
    let calendar_id = request.calendar_id.unwrap_or_else(|| "primary".to_string());

    let draft = EventDraft {
        title: request.title.unwrap_or_default(),
        start_time: request.start_time.unwrap_or_default(),
        end_time: request.end_time.unwrap_or_default(),
        description: request.description,
        location: request.location,
        attendees: request.attendees.unwrap_or_default(),
        reminder_minutes: request.reminder_minutes.unwrap_or(default_minutes),
    };

    let outcome = state.calendar.create_event(&calendar_id, draft).await;
    Json(outcome).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub reminder_minutes: Option<u32>,
}

/// Handler for partial event updates: omitted fields stay untouched, an
/// explicit empty description or location clears the field.
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path((calendar_id, event_id)): Path<(String, String)>,
    Json(request): Json<UpdateEventRequest>,
) -> impl IntoResponse {
    let patch = EventPatch {
        title: request.title,
        start_time: request.start_time,
        end_time: request.end_time,
        description: request.description,
        location: request.location,
        attendees: request.attendees,
        reminder_minutes: request.reminder_minutes,
    };

    let outcome = state
        .calendar
        .update_event(&calendar_id, &event_id, patch)
        .await;
    Json(outcome)
}

/// Handler for event deletion (attendees are notified)
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path((calendar_id, event_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let outcome = state.calendar.delete_event(&calendar_id, &event_id).await;
    Json(outcome)
}

/// Handler for single-event details
pub async fn event_details_handler(
    State(state): State<AppState>,
    Path((calendar_id, event_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let outcome = state
        .calendar
        .get_event_details(&calendar_id, &event_id)
        .await;
    Json(outcome)
}
