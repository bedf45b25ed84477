use crate::error::{calendar_error, AppResult, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use url::Url;

use super::models::{RawCalendarList, RawCalendarListEntry, RawEvent, RawEventList};
use super::token::TokenManager;

/// Base URL of the Calendar v3 API
const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Everything the mapper needs from the calendar provider. The seam keeps
/// aggregation logic testable without live HTTP.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Every calendar the authenticated user can see
    async fn list_calendars(&self) -> AppResult<Vec<RawCalendarListEntry>>;

    /// Events in `[time_min, time_max]`, recurring events expanded, ordered
    /// by start time
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> AppResult<Vec<RawEvent>>;

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> AppResult<RawEvent>;

    async fn insert_event(&self, calendar_id: &str, event: &RawEvent) -> AppResult<RawEvent>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RawEvent,
    ) -> AppResult<RawEvent>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()>;
}

/// Raw REST access to the Google Calendar API. All mutations request
/// attendee notification via `sendUpdates=all`.
#[derive(Clone)]
pub struct CalendarClient {
    token_manager: TokenManager,
    client: Client,
}

impl CalendarClient {
    pub fn new(token_manager: TokenManager) -> Self {
        Self {
            token_manager,
            client: Client::new(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> AppResult<Url> {
        let mut url = Url::parse(API_BASE)
            .map_err(|e| calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| calendar_error("Invalid API base URL"))?
            .push("calendars")
            .push(calendar_id)
            .push("events");
        Ok(url)
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> AppResult<Url> {
        let mut url = self.events_url(calendar_id)?;
        url.path_segments_mut()
            .map_err(|_| calendar_error("Invalid API base URL"))?
            .push(event_id);
        Ok(url)
    }

    async fn bearer(&self) -> AppResult<String> {
        let token = self.token_manager.access_token().await?;
        Ok(format!("Bearer {}", token))
    }

    async fn check(&self, context: &str, response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(calendar_error(&format!(
            "{}: HTTP {} - {}",
            context, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarProvider for CalendarClient {
    async fn list_calendars(&self) -> AppResult<Vec<RawCalendarListEntry>> {
        let url = format!("{}/users/me/calendarList", API_BASE);

        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to fetch calendar list: {}", e)))?;

        let response = self.check("Failed to fetch calendar list", response).await?;
        let list: RawCalendarList = response
            .json()
            .await
            .map_err(|e| calendar_error(&format!("Failed to parse calendar list: {}", e)))?;

        Ok(list.items)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> AppResult<Vec<RawEvent>> {
        let mut url = self.events_url(calendar_id)?;
        url.query_pairs_mut()
            .append_pair("timeMin", &time_min.to_rfc3339())
            .append_pair("timeMax", &time_max.to_rfc3339())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to fetch events: {}", e)))?;

        let response = self.check("Failed to fetch events", response).await?;
        let list: RawEventList = response
            .json()
            .await
            .map_err(|e| calendar_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(list.items)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> AppResult<RawEvent> {
        let url = self.event_url(calendar_id, event_id)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to fetch event: {}", e)))?;

        let response = self.check("Failed to fetch event", response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::CalendarApi(format!("Failed to parse event: {}", e)))
    }

    async fn insert_event(&self, calendar_id: &str, event: &RawEvent) -> AppResult<RawEvent> {
        let mut url = self.events_url(calendar_id)?;
        url.query_pairs_mut().append_pair("sendUpdates", "all");

        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer().await?)
            .json(event)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to create event: {}", e)))?;

        let response = self.check("Failed to create event", response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::CalendarApi(format!("Failed to parse created event: {}", e)))
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RawEvent,
    ) -> AppResult<RawEvent> {
        let mut url = self.event_url(calendar_id, event_id)?;
        url.query_pairs_mut().append_pair("sendUpdates", "all");

        let response = self
            .client
            .put(url)
            .header("Authorization", self.bearer().await?)
            .json(event)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to update event: {}", e)))?;

        let response = self.check("Failed to update event", response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::CalendarApi(format!("Failed to parse updated event: {}", e)))
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()> {
        let mut url = self.event_url(calendar_id, event_id)?;
        url.query_pairs_mut().append_pair("sendUpdates", "all");

        let response = self
            .client
            .delete(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| calendar_error(&format!("Failed to delete event: {}", e)))?;

        self.check("Failed to delete event", response).await?;
        Ok(())
    }
}
