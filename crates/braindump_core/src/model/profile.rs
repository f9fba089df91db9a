//! User profile model maintained alongside notes.

use crate::model::note::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display metadata supplied by the transport when a user registers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// Persisted per-user profile with activity counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub owner: OwnerId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub joined_at: DateTime<Utc>,
    /// Number of active notes at the last stats refresh.
    pub total_notes: u64,
    pub last_activity: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a fresh profile with zeroed counters.
    pub fn new(owner: OwnerId, display: &DisplayInfo, now: DateTime<Utc>) -> Self {
        Self {
            owner,
            username: display.username.clone(),
            first_name: display.first_name.clone(),
            joined_at: now,
            total_notes: 0,
            last_activity: now,
        }
    }
}
