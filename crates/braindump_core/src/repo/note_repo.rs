//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist analyzed notes and read them back with owner-scoped filters.
//! - Provide grouped counts (category / topic / UTC day) computed by storage.
//!
//! # Invariants
//! - Every query is constrained to one owner and one status.
//! - `delete_all` flips `status` to `deleted`; rows are never removed.
//! - Timestamps are stored as UTC epoch milliseconds.

use crate::model::analysis::{Analysis, Sentiment};
use crate::model::note::{Note, NoteId, NoteStatus, OwnerId};
use crate::repo::{ensure_table, to_count, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    notes.uuid AS uuid,
    notes.owner_id AS owner_id,
    notes.raw_text AS raw_text,
    notes.created_at AS created_at,
    notes.category AS category,
    notes.topics AS topics,
    notes.keywords AS keywords,
    notes.sentiment AS sentiment,
    notes.confidence AS confidence,
    notes.status AS status
FROM notes";

/// Owner-scoped note filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFilter {
    pub owner: OwnerId,
    pub status: NoteStatus,
    /// Exact category match.
    pub category: Option<String>,
    /// Note must carry this topic.
    pub topic: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<DateTime<Utc>>,
}

impl NoteFilter {
    /// Filter over all active notes of `owner`.
    pub fn active(owner: OwnerId) -> Self {
        Self {
            owner,
            status: NoteStatus::Active,
            category: None,
            topic: None,
            created_from: None,
            created_to: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn created_since(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_until(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// Evaluates the filter against an in-memory note.
    ///
    /// Mirrors the SQL predicate so alternative stores stay consistent.
    pub fn matches(&self, note: &Note) -> bool {
        note.owner == self.owner
            && note.status == self.status
            && self
                .category
                .as_ref()
                .map_or(true, |category| &note.analysis.category == category)
            && self
                .topic
                .as_ref()
                .map_or(true, |topic| note.analysis.topics.contains(topic))
            && self.created_from.map_or(true, |from| note.created_at >= from)
            && self.created_to.map_or(true, |to| note.created_at <= to)
    }
}

/// Result ordering by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteSort {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter plus ordering and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    pub filter: NoteFilter,
    pub sort: NoteSort,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl NoteQuery {
    /// Newest-first, unbounded query over `filter`.
    pub fn new(filter: NoteFilter) -> Self {
        Self {
            filter,
            sort: NoteSort::NewestFirst,
            limit: None,
            offset: 0,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn sort(mut self, sort: NoteSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Field a grouped count is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Category,
    /// Fan-out: a note counts once for each of its topics.
    Topic,
    /// UTC calendar day formatted as `YYYY-MM-DD`.
    Day,
}

/// Store contract for analyzed notes.
pub trait NoteRepository {
    /// Persists one note and returns its stable id.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Lists notes matching `query`.
    fn find_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>>;
    /// Counts active notes of `owner`.
    fn count_active(&self, owner: OwnerId) -> RepoResult<u64>;
    /// Groups notes matching `filter` by `field`, sorted by descending count
    /// then ascending key.
    fn group_count(&self, field: GroupField, filter: &NoteFilter) -> RepoResult<Vec<(String, u64)>>;
    /// Marks every active note of `owner` deleted and returns how many
    /// changed.
    fn delete_all(&self, owner: OwnerId) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
#[derive(Clone, Copy)]
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "notes")?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        let topics = serde_json::to_string(&note.analysis.topics)?;
        let keywords = serde_json::to_string(&note.analysis.keywords)?;

        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                owner_id,
                raw_text,
                created_at,
                category,
                topics,
                keywords,
                sentiment,
                confidence,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                note.id.to_string(),
                note.owner,
                note.raw_text.as_str(),
                note.created_at.timestamp_millis(),
                note.analysis.category.as_str(),
                topics,
                keywords,
                note.analysis.sentiment.as_str(),
                note.analysis.confidence,
                note.status.as_str(),
            ],
        )?;

        Ok(note.id)
    }

    fn find_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>> {
        let mut sql = String::from(NOTE_SELECT_SQL);
        let mut bind_values = Vec::new();
        push_filter(&mut sql, &mut bind_values, &query.filter);

        match query.sort {
            NoteSort::NewestFirst => sql.push_str(" ORDER BY notes.created_at DESC, notes.rowid DESC"),
            NoteSort::OldestFirst => sql.push_str(" ORDER BY notes.created_at ASC, notes.rowid ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn count_active(&self, owner: OwnerId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE owner_id = ?1 AND status = 'active';",
            [owner],
            |row| row.get(0),
        )?;
        to_count(count)
    }

    fn group_count(&self, field: GroupField, filter: &NoteFilter) -> RepoResult<Vec<(String, u64)>> {
        let (key_expr, from_clause) = match field {
            GroupField::Category => ("notes.category", "FROM notes"),
            GroupField::Topic => ("topic.value", "FROM notes, json_each(notes.topics) AS topic"),
            GroupField::Day => (
                "strftime('%Y-%m-%d', notes.created_at / 1000, 'unixepoch')",
                "FROM notes",
            ),
        };

        let mut sql = format!("SELECT {key_expr} AS group_key, COUNT(*) AS group_size {from_clause}");
        let mut bind_values = Vec::new();
        push_filter(&mut sql, &mut bind_values, filter);
        sql.push_str(" GROUP BY group_key ORDER BY group_size DESC, group_key ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get("group_key")?;
            let count: i64 = row.get("group_size")?;
            groups.push((key, to_count(count)?));
        }
        Ok(groups)
    }

    fn delete_all(&self, owner: OwnerId) -> RepoResult<u64> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET status = 'deleted'
             WHERE owner_id = ?1
               AND status = 'active';",
            [owner],
        )?;
        Ok(changed as u64)
    }
}

fn push_filter(sql: &mut String, bind_values: &mut Vec<Value>, filter: &NoteFilter) {
    sql.push_str(" WHERE notes.owner_id = ? AND notes.status = ?");
    bind_values.push(Value::Integer(filter.owner));
    bind_values.push(Value::Text(filter.status.as_str().to_string()));

    if let Some(category) = filter.category.as_ref() {
        sql.push_str(" AND notes.category = ?");
        bind_values.push(Value::Text(category.clone()));
    }

    if let Some(topic) = filter.topic.as_ref() {
        sql.push_str(
            " AND EXISTS (
                SELECT 1
                FROM json_each(notes.topics) AS topic_filter
                WHERE topic_filter.value = ?
            )",
        );
        bind_values.push(Value::Text(topic.clone()));
    }

    if let Some(from) = filter.created_from {
        sql.push_str(" AND notes.created_at >= ?");
        bind_values.push(Value::Integer(from.timestamp_millis()));
    }

    if let Some(to) = filter.created_to {
        sql.push_str(" AND notes.created_at <= ?");
        bind_values.push(Value::Integer(to.timestamp_millis()));
    }
}

pub(crate) fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let created_ms: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{created_ms}` in notes.created_at"))
    })?;

    let sentiment_text: String = row.get("sentiment")?;
    let sentiment = Sentiment::parse(&sentiment_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid sentiment `{sentiment_text}` in notes.sentiment"))
    })?;

    let status_text: String = row.get("status")?;
    let status = NoteStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in notes.status"))
    })?;

    let topics_json: String = row.get("topics")?;
    let keywords_json: String = row.get("keywords")?;

    Ok(Note {
        id,
        owner: row.get("owner_id")?,
        raw_text: row.get("raw_text")?,
        created_at,
        analysis: Analysis {
            category: row.get("category")?,
            topics: serde_json::from_str(&topics_json)?,
            keywords: serde_json::from_str(&keywords_json)?,
            sentiment,
            confidence: row.get("confidence")?,
        },
        status,
    })
}
