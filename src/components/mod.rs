pub mod google_calendar;
pub mod meeting_store;
pub mod news;
pub mod summarizer;
