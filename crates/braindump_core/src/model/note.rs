//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted record pairing raw text with its analysis.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `raw_text` is stored exactly as typed, never normalized.
//! - `status` only moves from `Active` to `Deleted` through bulk clear.

use crate::model::analysis::Analysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one note.
pub type NoteId = Uuid;

/// Identifier of the user owning notes, sessions and profiles.
///
/// Matches the integer user ids delivered by messaging transports.
pub type OwnerId = i64;

/// Visibility state of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    #[default]
    Active,
    /// Tombstoned by bulk clear; kept for recovery.
    Deleted,
}

impl NoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// One captured thought together with its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner: OwnerId,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
    pub analysis: Analysis,
    pub status: NoteStatus,
}

impl Note {
    /// Creates an active note stamped with the current time.
    pub fn new(owner: OwnerId, raw_text: impl Into<String>, analysis: Analysis) -> Self {
        Self::created_at(owner, raw_text, analysis, Utc::now())
    }

    /// Creates an active note with a caller-provided creation time.
    ///
    /// Used by import paths and tests that need deterministic timestamps.
    pub fn created_at(
        owner: OwnerId,
        raw_text: impl Into<String>,
        analysis: Analysis,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            raw_text: raw_text.into(),
            created_at,
            analysis,
            status: NoteStatus::Active,
        }
    }

    pub fn soft_delete(&mut self) {
        self.status = NoteStatus::Deleted;
    }

    pub fn is_active(&self) -> bool {
        self.status == NoteStatus::Active
    }
}
