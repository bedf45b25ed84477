use crate::config::Config;
use crate::error::AppResult;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::client::{CalendarClient, CalendarProvider};
use super::models::{
    CalendarEvent, CalendarListEntry, CreateEventOutcome, DeleteEventOutcome, EventDetailsOutcome,
    EventDraft, EventPatch, RawAttendee, RawCalendarListEntry, RawEvent, RawEventTime,
    RawReminderOverride, RawReminders, TodayAgenda, UpdateEventOutcome, DEFAULT_CALENDAR_COLOR,
    UNNAMED_CALENDAR, UNTITLED_EVENT,
};
use super::reminders::resolve_reminder;
use super::time::{day_window_utc, parse_instant, to_local};
use super::token::TokenManager;

/// Access roles allowed to receive new events
const WRITABLE_ROLES: [&str; 2] = ["owner", "writer"];

fn is_writable_role(role: Option<&str>) -> bool {
    role.is_some_and(|role| WRITABLE_ROLES.contains(&role))
}

/// Apply the start/end invariants for event creation: a start in the past is
/// forced to `now + 1 minute` with the end recomputed, and an end at or
/// before the start is forced to `start + 30 minutes`.
pub fn clamp_event_window(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, end) = if start < now {
        let start = now + Duration::minutes(1);
        (start, start + Duration::minutes(30))
    } else {
        (start, end)
    };

    if end <= start {
        (start, start + Duration::minutes(30))
    } else {
        (start, end)
    }
}

/// Normalize a provider event: attach calendar attribution, resolve the
/// effective reminder and convert times to the civil timezone.
pub fn normalize_event(
    raw: &RawEvent,
    calendar: &RawCalendarListEntry,
    tz: Tz,
    default_reminder_minutes: u32,
) -> AppResult<CalendarEvent> {
    let start_time = raw
        .start
        .value()
        .map(|v| to_local(v, tz))
        .transpose()?;
    let end_time = raw.end.value().map(|v| to_local(v, tz)).transpose()?;

    Ok(CalendarEvent {
        id: raw.id.clone(),
        title: raw
            .summary
            .clone()
            .unwrap_or_else(|| UNTITLED_EVENT.to_string()),
        start_time,
        end_time,
        description: raw.description.clone().unwrap_or_default(),
        calendar_id: calendar.id.clone(),
        calendar_name: calendar
            .summary
            .clone()
            .unwrap_or_else(|| UNNAMED_CALENDAR.to_string()),
        color: calendar
            .background_color
            .clone()
            .unwrap_or_else(|| DEFAULT_CALENDAR_COLOR.to_string()),
        reminder_minutes: resolve_reminder(raw.reminders.as_ref(), default_reminder_minutes),
    })
}

fn reminder_overrides(minutes: u32) -> RawReminders {
    RawReminders {
        use_default: false,
        overrides: vec![
            RawReminderOverride {
                method: "popup".to_string(),
                minutes,
            },
            RawReminderOverride {
                method: "email".to_string(),
                minutes,
            },
        ],
    }
}

/// Handle for all calendar operations: aggregation, normalization and
/// provider mutations. Mutating operations never propagate provider errors;
/// they come back as `{success: false, error}` outcomes.
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    client: Arc<dyn CalendarProvider>,
    config: Arc<RwLock<Config>>,
}

impl GoogleCalendarHandle {
    pub async fn new(config: Arc<RwLock<Config>>) -> Self {
        let cache_path = config.read().await.token_cache_path.clone();
        let token_manager = TokenManager::new(Arc::clone(&config), cache_path);

        Self {
            client: Arc::new(CalendarClient::new(token_manager)),
            config,
        }
    }

    async fn tz(&self) -> Tz {
        self.config.read().await.tz()
    }

    async fn default_reminder_minutes(&self) -> u32 {
        self.config.read().await.default_reminder_minutes
    }

    /// Today's agenda across every visible calendar, bounded by the local
    /// civil day. An empty aggregate is the sentinel, not an empty list.
    pub async fn list_today(&self) -> AppResult<TodayAgenda> {
        let tz = self.tz().await;
        let default_minutes = self.default_reminder_minutes().await;

        let now_local = Utc::now().with_timezone(&tz);
        let (time_min, time_max) = day_window_utc(now_local)?;

        let calendars = self.client.list_calendars().await?;
        let mut events = Vec::new();

        for calendar in &calendars {
            let raw_events = self
                .client
                .list_events(&calendar.id, time_min, time_max)
                .await?;
            for raw in &raw_events {
                events.push(normalize_event(raw, calendar, tz, default_minutes)?);
            }
        }

        info!("Fetched {} events for today", events.len());

        if events.is_empty() {
            Ok(TodayAgenda::Empty)
        } else {
            Ok(TodayAgenda::Events(events))
        }
    }

    /// Write-capable calendars only. Degrading to an empty list on provider
    /// failure is the caller's decision, not ours.
    pub async fn list_calendars(&self) -> AppResult<Vec<CalendarListEntry>> {
        let calendars = self.client.list_calendars().await?;

        Ok(calendars
            .into_iter()
            .filter(|c| is_writable_role(c.access_role.as_deref()))
            .map(|c| CalendarListEntry {
                id: c.id,
                summary: c.summary.unwrap_or_default(),
                description: c.description.unwrap_or_default(),
                background_color: c
                    .background_color
                    .unwrap_or_else(|| DEFAULT_CALENDAR_COLOR.to_string()),
                access_role: c.access_role.unwrap_or_default(),
            })
            .collect())
    }

    pub async fn create_event(&self, calendar_id: &str, draft: EventDraft) -> CreateEventOutcome {
        match self.try_create_event(calendar_id, draft).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to create event: {}", e);
                CreateEventOutcome::failed(e)
            }
        }
    }

    async fn try_create_event(
        &self,
        calendar_id: &str,
        draft: EventDraft,
    ) -> AppResult<CreateEventOutcome> {
        let tz = self.tz().await;

        let start = parse_instant(&draft.start_time)?;
        let end = parse_instant(&draft.end_time)?;
        let (start, end) = clamp_event_window(Utc::now(), start, end);

        let event = RawEvent {
            summary: Some(draft.title),
            description: draft.description,
            location: draft.location,
            start: RawEventTime {
                date_time: Some(start.with_timezone(&tz).to_rfc3339()),
                date: None,
                time_zone: Some(tz.name().to_string()),
            },
            end: RawEventTime {
                date_time: Some(end.with_timezone(&tz).to_rfc3339()),
                date: None,
                time_zone: Some(tz.name().to_string()),
            },
            attendees: if draft.attendees.is_empty() {
                None
            } else {
                Some(
                    draft
                        .attendees
                        .into_iter()
                        .map(|email| RawAttendee {
                            email,
                            ..Default::default()
                        })
                        .collect(),
                )
            },
            reminders: Some(reminder_overrides(draft.reminder_minutes)),
            ..Default::default()
        };

        let created = self.client.insert_event(calendar_id, &event).await?;
        info!("Created event {} in calendar {}", created.id, calendar_id);

        Ok(CreateEventOutcome::created(created.id, created.html_link))
    }

    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> UpdateEventOutcome {
        match self.try_update_event(calendar_id, event_id, patch).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to update event {}: {}", event_id, e);
                UpdateEventOutcome::failed(e)
            }
        }
    }

    async fn try_update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> AppResult<UpdateEventOutcome> {
        let tz = self.tz().await;
        let mut event = self.client.get_event(calendar_id, event_id).await?;

        if let Some(start_time) = &patch.start_time {
            let start = parse_instant(start_time)?;
            event.start = RawEventTime {
                date_time: Some(start.with_timezone(&tz).to_rfc3339()),
                date: None,
                time_zone: Some(tz.name().to_string()),
            };
        }

        if let Some(end_time) = &patch.end_time {
            let end = parse_instant(end_time)?;
            event.end = RawEventTime {
                date_time: Some(end.with_timezone(&tz).to_rfc3339()),
                date: None,
                time_zone: Some(tz.name().to_string()),
            };
        }

        // A blank title is treated as "not provided"; description and
        // location honor an explicit empty string as "clear the field"
        if let Some(title) = &patch.title {
            if !title.is_empty() {
                event.summary = Some(title.clone());
            }
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(location) = patch.location {
            event.location = Some(location);
        }
        if let Some(attendees) = patch.attendees {
            event.attendees = Some(
                attendees
                    .into_iter()
                    .map(|email| RawAttendee {
                        email,
                        ..Default::default()
                    })
                    .collect(),
            );
        }
        if let Some(minutes) = patch.reminder_minutes {
            event.reminders = Some(reminder_overrides(minutes));
        }

        let updated = self
            .client
            .update_event(calendar_id, event_id, &event)
            .await?;
        info!("Updated event {} in calendar {}", updated.id, calendar_id);

        Ok(UpdateEventOutcome {
            success: true,
            id: Some(updated.id),
            title: updated.summary,
            start: updated.start.date_time,
            end: updated.end.date_time,
            reminder_minutes: patch.reminder_minutes,
            error: None,
        })
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> DeleteEventOutcome {
        match self.client.delete_event(calendar_id, event_id).await {
            Ok(()) => {
                info!("Deleted event {} from calendar {}", event_id, calendar_id);
                DeleteEventOutcome::deleted()
            }
            Err(e) => {
                error!("Failed to delete event {}: {}", event_id, e);
                DeleteEventOutcome::failed(e)
            }
        }
    }

    pub async fn get_event_details(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> EventDetailsOutcome {
        match self.try_get_event_details(calendar_id, event_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to fetch event {}: {}", event_id, e);
                EventDetailsOutcome::failed(e)
            }
        }
    }

    async fn try_get_event_details(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> AppResult<EventDetailsOutcome> {
        let tz = self.tz().await;
        let default_minutes = self.default_reminder_minutes().await;

        let event = self.client.get_event(calendar_id, event_id).await?;

        let start = event.start.value().map(|v| to_local(v, tz)).transpose()?;
        let end = event.end.value().map(|v| to_local(v, tz)).transpose()?;

        Ok(EventDetailsOutcome {
            success: true,
            id: Some(event.id),
            title: Some(event.summary.unwrap_or_default()),
            start,
            end,
            description: Some(event.description.unwrap_or_default()),
            location: Some(event.location.unwrap_or_default()),
            attendees: event
                .attendees
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.email)
                .collect(),
            reminder_minutes: Some(resolve_reminder(event.reminders.as_ref(), default_minutes)),
            error: None,
        })
    }
}
