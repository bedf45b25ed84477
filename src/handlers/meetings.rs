use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{error_response, AppState};
use crate::components::meeting_store::{
    total_pages, MeetingFilter, NewMeeting, MEETINGS_PER_PAGE,
};
use crate::error::validation_error;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetingNotesRequest {
    pub text: Option<String>,
}

/// Handler for reformatting raw meeting notes into structured minutes
pub async fn process_meeting_notes_handler(
    State(state): State<AppState>,
    Json(request): Json<MeetingNotesRequest>,
) -> impl IntoResponse {
    let text = request.text.unwrap_or_default();

    match state.summarizer.format_meeting_notes(&text).await {
        Ok(minutes) => Json(json!({
            "status": "success",
            "message": minutes,
        }))
        .into_response(),
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveMeetingRequest {
    pub title: Option<String>,
    pub original_content: Option<String>,
    pub summarized_content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

/// Handler for persisting reformatted meeting notes
pub async fn save_meeting_notes_handler(
    State(state): State<AppState>,
    Json(request): Json<SaveMeetingRequest>,
) -> impl IntoResponse {
    let (Some(title), Some(original), Some(summarized)) = (
        request.title,
        request.original_content,
        request.summarized_content,
    ) else {
        let e = validation_error(
            "Missing required fields: title, original_content, summarized_content",
        );
        let (status, body) = error_response(&e);
        return (status, body).into_response();
    };

    let meeting = NewMeeting {
        title,
        original_content: original,
        summarized_content: summarized,
        category: request.category,
        tags: request.tags,
    };

    match state.store.create(meeting).await {
        Ok(record) => {
            info!("Saved meeting record {}", record.id);
            Json(json!({
                "status": "success",
                "meeting": record,
            }))
            .into_response()
        }
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetingListQuery {
    pub page: Option<u64>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// Resolve the listing window: explicit `skip`/`limit` win over the 1-based
/// `page` of nine records. The returned limit is also the page size the
/// response metadata is computed against.
fn listing_window(page: u64, skip: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    match (skip, limit) {
        (None, None) => ((page - 1) * MEETINGS_PER_PAGE, MEETINGS_PER_PAGE),
        (skip, limit) => (skip.unwrap_or(0), limit.unwrap_or(MEETINGS_PER_PAGE)),
    }
}

/// Handler for the paged meetings listing, newest first. Either explicit
/// `skip`/`limit` or a 1-based `page` of nine records.
pub async fn list_meetings_handler(
    State(state): State<AppState>,
    Query(query): Query<MeetingListQuery>,
) -> impl IntoResponse {
    let filter = MeetingFilter {
        category: query.category,
        tag: query.tag,
    };

    let page = query.page.unwrap_or(1).max(1);
    let (skip, limit) = listing_window(page, query.skip, query.limit);

    let total = match state.store.count(&filter).await {
        Ok(total) => total,
        Err(e) => {
            let (status, body) = error_response(&e);
            return (status, body).into_response();
        }
    };

    match state.store.list(skip, limit, &filter).await {
        Ok(meetings) => Json(json!({
            "status": "success",
            "meetings": meetings,
            "page": page,
            "total": total,
            "total_pages": total_pages(total, limit),
        }))
        .into_response(),
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

/// Handler for a single meeting record
pub async fn get_meeting_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.get(id).await {
        Ok(record) => Json(json!({
            "status": "success",
            "meeting": record,
        }))
        .into_response(),
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

/// Handler for meeting deletion; a missing id answers 404
pub async fn delete_meeting_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete(id).await {
        Ok(()) => {
            info!("Deleted meeting record {}", id);
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Meeting deleted",
                })),
            )
                .into_response()
        }
        Err(e) => {
            let (status, body) = error_response(&e);
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_window_defaults_to_page() {
        assert_eq!(listing_window(1, None, None), (0, MEETINGS_PER_PAGE));
        assert_eq!(listing_window(3, None, None), (18, MEETINGS_PER_PAGE));
    }

    #[test]
    fn test_listing_window_explicit_overrides() {
        assert_eq!(listing_window(1, Some(4), Some(5)), (4, 5));
        assert_eq!(listing_window(1, Some(4), None), (4, MEETINGS_PER_PAGE));
        assert_eq!(listing_window(1, None, Some(5)), (0, 5));
    }

    #[test]
    fn test_page_metadata_follows_effective_limit() {
        // 12 records at an explicit limit of 5 is 3 pages, not the 2 the
        // default page size would suggest
        let (_, limit) = listing_window(1, Some(0), Some(5));
        assert_eq!(total_pages(12, limit), 3);

        let (_, limit) = listing_window(2, None, None);
        assert_eq!(total_pages(12, limit), 2);
    }
}
