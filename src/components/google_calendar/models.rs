use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw Google Calendar v3 shapes
// ---------------------------------------------------------------------------

/// Event start or end as the provider sends it: a dateTime for timed events,
/// a bare date for all-day events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RawEventTime {
    /// The dateTime when present, otherwise the bare date
    pub fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReminderOverride {
    pub method: String,
    pub minutes: u32,
}

fn default_true() -> bool {
    true
}

/// The provider's reminder block: either "use the calendar default" or an
/// explicit override list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReminders {
    #[serde(default = "default_true")]
    pub use_default: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RawReminderOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttendee {
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A provider event. Unknown fields are carried in `extra` so partial updates
/// can round-trip the full resource unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: RawEventTime,
    pub end: RawEventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<RawAttendee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<RawReminders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEventList {
    pub items: Vec<RawEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCalendarListEntry {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub background_color: Option<String>,
    pub access_role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCalendarList {
    pub items: Vec<RawCalendarListEntry>,
}

// ---------------------------------------------------------------------------
// Normalized shapes
// ---------------------------------------------------------------------------

/// An instant normalized to the civil timezone, or a bare calendar date for
/// all-day events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    DateTime(DateTime<Tz>),
    Date(NaiveDate),
}

impl EventTime {
    /// ISO-8601 rendering: RFC 3339 for timed events, `YYYY-MM-DD` for
    /// all-day events
    pub fn iso8601(&self) -> String {
        match self {
            EventTime::DateTime(dt) => dt.to_rfc3339(),
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Serialize for EventTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.iso8601())
    }
}

/// Placeholder title for events with no summary
pub const UNTITLED_EVENT: &str = "(no title)";

/// Fallback display name for calendars with no summary
pub const UNNAMED_CALENDAR: &str = "(unnamed calendar)";

/// Fallback background color matching the provider's default calendar color
pub const DEFAULT_CALENDAR_COLOR: &str = "#039BE5";

/// Normalized calendar event with calendar attribution and resolved reminder
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: Option<EventTime>,
    pub end_time: Option<EventTime>,
    pub description: String,
    pub calendar_id: String,
    pub calendar_name: String,
    pub color: String,
    pub reminder_minutes: u32,
}

/// A write-capable calendar visible to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub background_color: String,
    pub access_role: String,
}

/// The day's agenda, or a sentinel standing for "empty by design"
#[derive(Debug, Clone)]
pub enum TodayAgenda {
    Events(Vec<CalendarEvent>),
    Empty,
}

/// Message returned in place of an empty agenda
pub const NO_EVENTS_TODAY: &str = "No events scheduled for today.";

// ---------------------------------------------------------------------------
// Mutation inputs and outcomes
// ---------------------------------------------------------------------------

/// Validated input for event creation
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub reminder_minutes: u32,
}

/// Partial update: `None` leaves a field untouched. For description and
/// location an explicit empty string clears the field; a title update is
/// applied only when non-empty.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub reminder_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEventOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateEventOutcome {
    pub fn created(id: String, html_link: Option<String>) -> Self {
        Self {
            success: true,
            id: Some(id),
            html_link,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEventOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateEventOutcome {
    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteEventOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteEventOutcome {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: Some("Event deleted successfully.".to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventDetailsOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventDetailsOutcome {
    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}
