mod client;
mod mapper;
pub mod models;
pub mod reminders;
pub mod time;
pub mod token;

pub use mapper::{clamp_event_window, normalize_event, GoogleCalendarHandle};
pub use models::{CalendarEvent, CalendarListEntry, TodayAgenda, NO_EVENTS_TODAY};
