//! Owner-scoped note search on the FTS5 index.
//!
//! # Responsibility
//! - Turn chat-style search text into an FTS5 `MATCH` expression.
//! - Return ranked notes with a highlighted excerpt.
//!
//! # Invariants
//! - Only active notes of the requesting owner are returned.
//! - Equal ranks fall back to newest first, so results are reproducible.

use crate::db::DbError;
use crate::model::note::{Note, OwnerId};
use crate::repo::note_repo::parse_note_row;
use crate::repo::RepoError;
use log::debug;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hits returned when the caller does not ask for another limit.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

const SEARCH_SQL: &str = "SELECT
    notes.uuid AS uuid,
    notes.owner_id AS owner_id,
    notes.raw_text AS raw_text,
    notes.created_at AS created_at,
    notes.category AS category,
    notes.topics AS topics,
    notes.keywords AS keywords,
    notes.sentiment AS sentiment,
    notes.confidence AS confidence,
    notes.status AS status,
    snippet(notes_fts, 0, '[', ']', ' ... ', 10) AS excerpt
FROM notes_fts
JOIN notes ON notes.rowid = notes_fts.rowid
WHERE notes_fts MATCH ?1
  AND notes.owner_id = ?2
  AND notes.status = 'active'
ORDER BY bm25(notes_fts), notes.created_at DESC, notes.rowid DESC
LIMIT ?3";

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    /// Raw FTS5 syntax was requested and SQLite rejected it.
    BadSyntax {
        expression: String,
        detail: String,
    },
    Db(DbError),
    /// A matched row could not be decoded into a note.
    Decode(RepoError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadSyntax { expression, detail } => {
                write!(f, "search expression `{expression}` rejected: {detail}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "cannot decode search hit: {err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BadSyntax { .. } => None,
            Self::Db(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::Decode(other),
        }
    }
}

/// What to search for and for whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSearchQuery {
    pub owner: OwnerId,
    /// Whitespace separated words; every word must occur.
    pub text: String,
    pub limit: u32,
    /// Use `text` verbatim as an FTS5 expression instead of quoting words.
    pub raw_fts_syntax: bool,
}

impl NoteSearchQuery {
    pub fn new(owner: OwnerId, text: impl Into<String>) -> Self {
        Self {
            owner,
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            raw_fts_syntax: false,
        }
    }
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub note: Note,
    /// Excerpt around the match with hit words wrapped in `[` `]`.
    pub snippet: String,
}

/// Runs `query` against the FTS index.
///
/// Blank text or a zero limit short-circuit to no hits.
pub fn search_notes(conn: &Connection, query: &NoteSearchQuery) -> SearchResult<Vec<SearchHit>> {
    let expression = match match_expression(query) {
        Some(expression) if query.limit > 0 => expression,
        _ => return Ok(Vec::new()),
    };

    let reject = |err: rusqlite::Error| classify(err, &expression);
    let mut stmt = conn.prepare_cached(SEARCH_SQL).map_err(reject)?;
    let mut rows = stmt
        .query(params![expression, query.owner, i64::from(query.limit)])
        .map_err(reject)?;

    let mut hits = Vec::new();
    while let Some(row) = rows.next().map_err(reject)? {
        let snippet: String = row.get("excerpt").map_err(reject)?;
        hits.push(SearchHit {
            note: parse_note_row(row)?,
            snippet,
        });
    }

    debug!(
        "event=search module=search status=ok owner={} hits={}",
        query.owner,
        hits.len()
    );
    Ok(hits)
}

/// Quotes each word so punctuation in chat text is never parsed as syntax.
fn match_expression(query: &NoteSearchQuery) -> Option<String> {
    let text = query.text.trim();
    if text.is_empty() {
        return None;
    }
    if query.raw_fts_syntax {
        return Some(text.to_string());
    }

    let quoted: Vec<String> = text
        .split_whitespace()
        .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
        .collect();
    Some(quoted.join(" AND "))
}

fn classify(err: rusqlite::Error, expression: &str) -> SearchError {
    let detail = match &err {
        rusqlite::Error::SqliteFailure(_, Some(detail)) => detail.to_lowercase(),
        _ => return SearchError::Db(DbError::Sqlite(err)),
    };

    let syntax = ["fts5: syntax error", "unterminated string", "malformed match"]
        .iter()
        .any(|marker| detail.contains(marker));
    if syntax {
        SearchError::BadSyntax {
            expression: expression.to_string(),
            detail,
        }
    } else {
        SearchError::Db(DbError::Sqlite(err))
    }
}

#[cfg(test)]
mod tests {
    use super::{match_expression, NoteSearchQuery};

    #[test]
    fn words_are_quoted_and_required() {
        let query = NoteSearchQuery::new(1, "  rent \"due\"  ");
        assert_eq!(
            match_expression(&query).as_deref(),
            Some("\"rent\" AND \"\"\"due\"\"\"")
        );
    }

    #[test]
    fn raw_syntax_passes_through_trimmed() {
        let mut query = NoteSearchQuery::new(1, " rent OR salary ");
        query.raw_fts_syntax = true;
        assert_eq!(match_expression(&query).as_deref(), Some("rent OR salary"));
    }

    #[test]
    fn blank_text_has_no_expression() {
        assert!(match_expression(&NoteSearchQuery::new(1, " \t ")).is_none());
    }
}
