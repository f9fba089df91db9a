//! Core domain logic for braindump.
//! Text analysis, capture sessions, aggregation and note storage live here;
//! front ends only translate input and render reports.

pub mod aggregate;
pub mod analysis;
pub mod capture;
pub mod config;
pub mod db;
pub mod lexicon;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use aggregate::{CountEntry, Summary};
pub use analysis::Analyzer;
pub use capture::session::{CaptureMode, CaptureSession};
pub use capture::store::{InMemorySessionStore, SessionHandle, SessionStore};
pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use lexicon::{Lexicon, LexiconError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::analysis::{Analysis, Sentiment};
pub use model::note::{Note, NoteId, NoteStatus, OwnerId};
pub use model::profile::{DisplayInfo, UserProfile};
pub use repo::note_repo::{NoteFilter, NoteQuery, NoteRepository, SqliteNoteRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_notes, NoteSearchQuery, SearchError, SearchHit, SearchResult};
pub use service::capture_service::{
    CaptureError, CaptureService, CloseReport, FlushReport, IngestReport, OpenReport,
};
pub use service::note_service::{NoteService, NoteServiceError, UserStats, WindowReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
