mod components;
mod config;
mod error;
mod handlers;
mod startup;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use miette::IntoDiagnostic;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::components::google_calendar::GoogleCalendarHandle;
use crate::components::meeting_store::{MeetingStore, SqliteMeetingStore};
use crate::components::summarizer::Summarizer;
use crate::handlers::{
    create_event_handler, delete_event_handler, delete_meeting_handler, event_details_handler,
    get_meeting_handler, health_handler, index_handler, list_calendars_handler,
    list_meetings_handler, process_meeting_notes_handler, save_meeting_notes_handler,
    summarize_handler, today_handler, update_event_handler, AppState,
};

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting daybook");

    // Load configuration
    let config = startup::load_config()?;

    let (database_path, openai_api_key, openai_model, port) = {
        let config = config.read().await;
        (
            config.database_path.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.port,
        )
    };

    let calendar = GoogleCalendarHandle::new(config.clone()).await;
    let store: Arc<dyn MeetingStore> = Arc::new(SqliteMeetingStore::open(&database_path)?);
    info!("Opened meeting store at {}", database_path);
    let summarizer = Arc::new(Summarizer::new(&openai_api_key, &openai_model));

    let state = AppState {
        config,
        calendar,
        store,
        summarizer,
        http: reqwest::Client::new(),
    };

    // Build the router
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/calendar/today", get(today_handler))
        .route("/calendar/list", get(list_calendars_handler))
        .route("/calendar/add", post(create_event_handler))
        .route(
            "/calendar/update/{calendar_id}/{event_id}",
            put(update_event_handler),
        )
        .route(
            "/calendar/event/{calendar_id}/{event_id}",
            get(event_details_handler),
        )
        .route(
            "/calendar/delete/{calendar_id}/{event_id}",
            delete(delete_event_handler),
        )
        .route("/summarize", get(summarize_handler))
        .route("/process_meeting_notes", post(process_meeting_notes_handler))
        .route("/save_meeting_notes", post(save_meeting_notes_handler))
        .route("/meetings", get(list_meetings_handler))
        .route("/meetings/{id}", get(get_meeting_handler))
        .route("/meetings/{id}", delete(delete_meeting_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Bind to address and run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    axum::serve(listener, app).await.into_diagnostic()?;

    Ok(())
}
