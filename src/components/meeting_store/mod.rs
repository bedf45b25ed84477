mod sqlite;

pub use sqlite::SqliteMeetingStore;

use crate::error::{AppResult, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Category assigned when the caller supplies none
pub const DEFAULT_CATEGORY: &str = "auto";

/// Records per page for the meetings listing
pub const MEETINGS_PER_PAGE: u64 = 9;

/// Number of pages needed for `total` records at `per_page` records each
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// A persisted meeting record
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRecord {
    pub id: i64,
    pub title: String,
    pub original_content: String,
    pub summarized_content: String,
    pub category: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for meeting creation
#[derive(Debug, Clone, Default)]
pub struct NewMeeting {
    pub title: String,
    pub original_content: String,
    pub summarized_content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
}

/// Listing filter: exact category match, substring tag containment
#[derive(Debug, Clone, Default)]
pub struct MeetingFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl MeetingFilter {
    fn matches(&self, record: &MeetingRecord) -> bool {
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            match &record.tags {
                Some(tags) if tags.contains(tag.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Storage seam for meeting records
#[async_trait]
pub trait MeetingStore: Send + Sync + 'static {
    /// Insert a new record; a missing category defaults to `"auto"`
    async fn create(&self, meeting: NewMeeting) -> AppResult<MeetingRecord>;

    /// Newest-first page of records matching the filter
    async fn list(
        &self,
        skip: u64,
        limit: u64,
        filter: &MeetingFilter,
    ) -> AppResult<Vec<MeetingRecord>>;

    /// Total records matching the filter
    async fn count(&self, filter: &MeetingFilter) -> AppResult<u64>;

    /// Fetch one record, `NotFound` when absent
    async fn get(&self, id: i64) -> AppResult<MeetingRecord>;

    /// Remove one record, `NotFound` when absent
    async fn delete(&self, id: i64) -> AppResult<()>;
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("Meeting {} not found", id))
}

/// In-memory implementation of the store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryMeetingStore {
    records: RwLock<Vec<MeetingRecord>>,
    next_id: AtomicI64,
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    async fn create(&self, meeting: NewMeeting) -> AppResult<MeetingRecord> {
        let record = MeetingRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: meeting.title,
            original_content: meeting.original_content,
            summarized_content: meeting.summarized_content,
            category: meeting
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: meeting.tags,
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        skip: u64,
        limit: u64,
        filter: &MeetingFilter,
    ) -> AppResult<Vec<MeetingRecord>> {
        let records = self.records.read().await;

        let mut matched: Vec<MeetingRecord> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(matched
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &MeetingFilter) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn get(&self, id: i64) -> AppResult<MeetingRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(1, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(18, 9), 2);
        assert_eq!(total_pages(19, 9), 3);
    }

    #[test]
    fn test_last_page_size() {
        let total: u64 = 20;
        let per_page = MEETINGS_PER_PAGE;
        let pages = total_pages(total, per_page);
        assert_eq!(pages, 3);

        let last_page_size = total - (pages - 1) * per_page;
        assert_eq!(last_page_size, 2);

        // Evenly divisible total fills the last page completely
        assert_eq!(27 - (total_pages(27, per_page) - 1) * per_page, 9);
    }
}
