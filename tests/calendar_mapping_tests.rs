use daybook::components::google_calendar::models::{
    EventTime, RawCalendarListEntry, RawEvent, DEFAULT_CALENDAR_COLOR, UNTITLED_EVENT,
};
use daybook::components::google_calendar::normalize_event;
use serde_json::json;

fn raw_event(value: serde_json::Value) -> RawEvent {
    serde_json::from_value(value).unwrap()
}

fn raw_calendar(value: serde_json::Value) -> RawCalendarListEntry {
    serde_json::from_value(value).unwrap()
}

fn personal_calendar() -> RawCalendarListEntry {
    raw_calendar(json!({
        "id": "personal@example.com",
        "summary": "Personal",
        "backgroundColor": "#7986CB",
        "accessRole": "owner"
    }))
}

/// A timed event is converted into the civil timezone
#[test]
fn test_normalize_timed_event() {
    let raw = raw_event(json!({
        "id": "evt1",
        "summary": "Morning standup",
        "start": {"dateTime": "2024-05-01T00:30:00Z"},
        "end": {"dateTime": "2024-05-01T01:00:00Z"}
    }));

    let event = normalize_event(&raw, &personal_calendar(), chrono_tz::Asia::Seoul, 10).unwrap();

    assert_eq!(event.title, "Morning standup");
    assert_eq!(event.calendar_id, "personal@example.com");
    assert_eq!(event.calendar_name, "Personal");
    assert_eq!(event.color, "#7986CB");
    assert_eq!(
        event.start_time.unwrap().iso8601(),
        "2024-05-01T09:30:00+09:00"
    );
    assert_eq!(
        event.end_time.unwrap().iso8601(),
        "2024-05-01T10:00:00+09:00"
    );
}

/// An all-day event keeps its civil date instead of gaining a time of day
#[test]
fn test_normalize_all_day_event() {
    let raw = raw_event(json!({
        "id": "evt2",
        "summary": "Public holiday",
        "start": {"date": "2024-05-05"},
        "end": {"date": "2024-05-06"}
    }));

    let event = normalize_event(&raw, &personal_calendar(), chrono_tz::Asia::Seoul, 10).unwrap();

    assert!(matches!(event.start_time, Some(EventTime::Date(_))));
    assert_eq!(event.start_time.unwrap().iso8601(), "2024-05-05");
}

/// Missing title and calendar color fall back to their placeholders
#[test]
fn test_normalize_fallbacks() {
    let raw = raw_event(json!({
        "id": "evt3",
        "start": {"dateTime": "2024-05-01T10:00:00+09:00"},
        "end": {"dateTime": "2024-05-01T11:00:00+09:00"}
    }));
    let calendar = raw_calendar(json!({
        "id": "team@example.com"
    }));

    let event = normalize_event(&raw, &calendar, chrono_tz::Asia::Seoul, 10).unwrap();

    assert_eq!(event.title, UNTITLED_EVENT);
    assert_eq!(event.color, DEFAULT_CALENDAR_COLOR);
    assert_eq!(event.description, "");
}

/// With no reminder block the configured default applies
#[test]
fn test_normalize_default_reminder() {
    let raw = raw_event(json!({
        "id": "evt4",
        "summary": "Dentist",
        "start": {"dateTime": "2024-05-01T10:00:00+09:00"},
        "end": {"dateTime": "2024-05-01T11:00:00+09:00"}
    }));

    let event = normalize_event(&raw, &personal_calendar(), chrono_tz::Asia::Seoul, 10).unwrap();
    assert_eq!(event.reminder_minutes, 10);
}

/// The first popup override beats both later overrides and the default
#[test]
fn test_normalize_popup_override() {
    let raw = raw_event(json!({
        "id": "evt5",
        "summary": "Flight",
        "start": {"dateTime": "2024-05-01T10:00:00+09:00"},
        "end": {"dateTime": "2024-05-01T13:00:00+09:00"},
        "reminders": {
            "useDefault": false,
            "overrides": [
                {"method": "email", "minutes": 60},
                {"method": "popup", "minutes": 45},
                {"method": "popup", "minutes": 5}
            ]
        }
    }));

    let event = normalize_event(&raw, &personal_calendar(), chrono_tz::Asia::Seoul, 10).unwrap();
    assert_eq!(event.reminder_minutes, 45);
}

/// A garbage timestamp surfaces an error instead of a half-built event
#[test]
fn test_normalize_malformed_timestamp() {
    let raw = raw_event(json!({
        "id": "evt6",
        "summary": "Broken",
        "start": {"dateTime": "not-a-timestamp"},
        "end": {"dateTime": "2024-05-01T11:00:00+09:00"}
    }));

    let result = normalize_event(&raw, &personal_calendar(), chrono_tz::Asia::Seoul, 10);
    assert!(result.is_err());
}

/// Unknown provider fields survive a deserialize and serialize round trip
#[test]
fn test_raw_event_keeps_unknown_fields() {
    let raw = raw_event(json!({
        "id": "evt7",
        "summary": "Offsite",
        "start": {"dateTime": "2024-05-01T10:00:00+09:00"},
        "end": {"dateTime": "2024-05-01T11:00:00+09:00"},
        "colorId": "6",
        "transparency": "opaque"
    }));

    let round_tripped = serde_json::to_value(&raw).unwrap();
    assert_eq!(round_tripped["colorId"], "6");
    assert_eq!(round_tripped["transparency"], "opaque");
}
