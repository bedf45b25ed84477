use super::{MeetingFilter, MeetingRecord, MeetingStore, NewMeeting, DEFAULT_CATEGORY};
use crate::error::{other_error, AppResult, Error};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS meetings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    original_content TEXT NOT NULL,
    summarized_content TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'auto',
    tags TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_meetings_created_at ON meetings(created_at);
";

const COLUMNS: &str =
    "id, title, original_content, summarized_content, category, tags, created_at, updated_at";

/// Fixed-width UTC text timestamps so lexicographic ordering matches
/// chronological ordering
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MeetingRecord> {
    let created_at: String = row.get(6)?;
    let updated_at: Option<String> = row.get(7)?;

    Ok(MeetingRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        original_content: row.get(2)?,
        summarized_content: row.get(3)?,
        category: row.get(4)?,
        tags: row.get(5)?,
        created_at: parse_ts(6, &created_at)?,
        updated_at: updated_at.as_deref().map(|s| parse_ts(7, s)).transpose()?,
    })
}

/// Build the WHERE clause for a filter. Category is exact, tag is substring
/// containment; records with no tags never match a tag filter.
fn filter_clause(filter: &MeetingFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(category) = &filter.category {
        clauses.push("category = ?");
        values.push(Value::Text(category.clone()));
    }
    if let Some(tag) = &filter.tag {
        clauses.push("instr(tags, ?) > 0");
        values.push(Value::Text(tag.clone()));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// SQLite-backed meeting store. The connection sits behind a mutex; every
/// statement is short-lived, so contention is negligible at this scale.
pub struct SqliteMeetingStore {
    conn: Mutex<Connection>,
}

impl SqliteMeetingStore {
    /// Open (and bootstrap) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        info!("Meeting database ready at {}", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fresh in-memory database (tests)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| other_error("Meeting store mutex poisoned"))
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn create(&self, meeting: NewMeeting) -> AppResult<MeetingRecord> {
        let category = meeting
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let created_at = Utc::now();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO meetings (title, original_content, summarized_content, category, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                meeting.title,
                meeting.original_content,
                meeting.summarized_content,
                category,
                meeting.tags,
                format_ts(created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(MeetingRecord {
            id,
            title: meeting.title,
            original_content: meeting.original_content,
            summarized_content: meeting.summarized_content,
            category,
            tags: meeting.tags,
            created_at,
            updated_at: None,
        })
    }

    async fn list(
        &self,
        skip: u64,
        limit: u64,
        filter: &MeetingFilter,
    ) -> AppResult<Vec<MeetingRecord>> {
        let (clause, mut values) = filter_clause(filter);
        let sql = format!(
            "SELECT {} FROM meetings{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            COLUMNS, clause
        );
        values.push(Value::Integer(limit as i64));
        values.push(Value::Integer(skip as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    async fn count(&self, filter: &MeetingFilter) -> AppResult<u64> {
        let (clause, values) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM meetings{}", clause);

        let conn = self.lock()?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn get(&self, id: i64) -> AppResult<MeetingRecord> {
        let sql = format!("SELECT {} FROM meetings WHERE id = ?1", COLUMNS);

        let conn = self.lock()?;
        conn.query_row(&sql, params![id], map_row)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Meeting {} not found", id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Meeting {} not found", id)));
        }
        Ok(())
    }
}
