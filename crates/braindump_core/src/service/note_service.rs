//! Note query use-case service.
//!
//! # Responsibility
//! - Answer the read-side questions of a user: recent notes, notes in a
//!   rolling window, per-window summaries and overall statistics.
//! - Own profile registration and the bulk clear.
//!
//! # Invariants
//! - Only active notes are ever returned or counted.
//! - Window queries are capped at [`WINDOW_NOTE_CAP`] notes.
//! - Clearing is a soft delete followed by a profile stat refresh.

use crate::aggregate::{self, CountEntry, Summary};
use crate::lexicon::Lexicon;
use crate::model::note::{Note, OwnerId};
use crate::model::profile::{DisplayInfo, UserProfile};
use crate::repo::note_repo::{GroupField, NoteFilter, NoteQuery, NoteRepository};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Default size of the "recent notes" view.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;
/// Upper bound on notes loaded for one window.
pub const WINDOW_NOTE_CAP: u32 = 100;

/// Service error for note queries.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Caller asked for an empty window.
    InvalidWindow(i64),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(days) => write!(f, "window must span at least one day, got {days}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidWindow(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Notes of one rolling window plus their aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub from: DateTime<Utc>,
    /// Newest first.
    pub notes: Vec<Note>,
    pub summary: Summary,
}

/// Lifetime statistics of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Absent when the user never registered.
    pub profile: Option<UserProfile>,
    pub total_notes: u64,
    pub categories: Vec<CountEntry>,
    pub topics: Vec<CountEntry>,
}

impl UserStats {
    pub fn top_category(&self) -> Option<&CountEntry> {
        self.categories.first()
    }
}

/// Read-side facade over note and profile storage.
pub struct NoteService<N: NoteRepository, P: ProfileRepository> {
    notes: N,
    profiles: P,
    lexicon: Arc<Lexicon>,
}

impl<N: NoteRepository, P: ProfileRepository> NoteService<N, P> {
    pub fn new(notes: N, profiles: P, lexicon: Arc<Lexicon>) -> Self {
        Self {
            notes,
            profiles,
            lexicon,
        }
    }

    /// Registers the user on first contact; later calls return the stored
    /// profile unchanged.
    pub fn register(
        &self,
        owner: OwnerId,
        display: &DisplayInfo,
    ) -> Result<UserProfile, NoteServiceError> {
        let profile = self.profiles.get_or_create(owner, display)?;
        info!("event=profile_register module=service status=ok owner={owner}");
        Ok(profile)
    }

    /// Newest active notes, at most `limit`.
    pub fn recent(&self, owner: OwnerId, limit: u32) -> Result<Vec<Note>, NoteServiceError> {
        let query = NoteQuery::new(NoteFilter::active(owner)).limit(limit);
        Ok(self.notes.find_notes(&query)?)
    }

    /// Active notes created within `days_back` days before `now`.
    pub fn window(
        &self,
        owner: OwnerId,
        now: DateTime<Utc>,
        days_back: i64,
    ) -> Result<WindowReport, NoteServiceError> {
        if days_back < 1 {
            return Err(NoteServiceError::InvalidWindow(days_back));
        }

        let from = now - Duration::days(days_back);
        let filter = NoteFilter::active(owner)
            .created_since(from)
            .created_until(now);
        let notes = self
            .notes
            .find_notes(&NoteQuery::new(filter).limit(WINDOW_NOTE_CAP))?;
        let summary = aggregate::summarize(&self.lexicon, &notes);
        Ok(WindowReport {
            from,
            notes,
            summary,
        })
    }

    /// Totals and group counts over every active note of the user.
    pub fn stats(&self, owner: OwnerId) -> Result<UserStats, NoteServiceError> {
        let filter = NoteFilter::active(owner);
        let total_notes = self.notes.count_active(owner)?;
        let categories = to_entries(self.notes.group_count(GroupField::Category, &filter)?);
        let topics = to_entries(self.notes.group_count(GroupField::Topic, &filter)?);
        let profile = self.profiles.get_profile(owner)?;

        Ok(UserStats {
            profile,
            total_notes,
            categories,
            topics,
        })
    }

    /// Soft-deletes every active note of the user and returns how many.
    pub fn clear(&self, owner: OwnerId) -> Result<u64, NoteServiceError> {
        let cleared = self.notes.delete_all(owner)?;
        if let Err(err) = self.profiles.update_activity_stats(owner) {
            warn!("event=profile_refresh module=service status=error owner={owner} error={err}");
        }
        info!("event=notes_clear module=service status=ok owner={owner} cleared={cleared}");
        Ok(cleared)
    }
}

fn to_entries(groups: Vec<(String, u64)>) -> Vec<CountEntry> {
    groups
        .into_iter()
        .map(|(key, count)| CountEntry {
            key,
            count: usize::try_from(count).unwrap_or(usize::MAX),
        })
        .collect()
}
