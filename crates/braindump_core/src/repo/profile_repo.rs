//! User profile repository contract and SQLite implementation.

use crate::model::note::OwnerId;
use crate::model::profile::{DisplayInfo, UserProfile};
use crate::repo::{ensure_table, to_count, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

/// Store contract for user profiles.
pub trait ProfileRepository {
    /// Returns the owner's profile, creating it from `display` when missing.
    fn get_or_create(&self, owner: OwnerId, display: &DisplayInfo) -> RepoResult<UserProfile>;
    fn get_profile(&self, owner: OwnerId) -> RepoResult<Option<UserProfile>>;
    /// Refreshes `total_notes` from active notes and stamps `last_activity`.
    ///
    /// Owners without a profile are left untouched.
    fn update_activity_stats(&self, owner: OwnerId) -> RepoResult<()>;
}

/// SQLite-backed profile repository.
#[derive(Clone, Copy)]
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "profiles")?;
        ensure_table(conn, "notes")?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn get_or_create(&self, owner: OwnerId, display: &DisplayInfo) -> RepoResult<UserProfile> {
        if let Some(profile) = self.get_profile(owner)? {
            return Ok(profile);
        }

        let profile = UserProfile::new(owner, display, Utc::now());
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles (
                owner_id,
                username,
                first_name,
                joined_at,
                total_notes,
                last_activity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                profile.owner,
                profile.username.as_deref(),
                profile.first_name.as_deref(),
                profile.joined_at.timestamp_millis(),
                0_i64,
                profile.last_activity.timestamp_millis(),
            ],
        )?;

        self.get_profile(owner)?.ok_or_else(|| {
            RepoError::InvalidData(format!("profile {owner} missing after insert"))
        })
    }

    fn get_profile(&self, owner: OwnerId) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                owner_id,
                username,
                first_name,
                joined_at,
                total_notes,
                last_activity
             FROM profiles
             WHERE owner_id = ?1;",
        )?;
        let mut rows = stmt.query([owner])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_profile_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_activity_stats(&self, owner: OwnerId) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE profiles
             SET
                total_notes = (
                    SELECT COUNT(*)
                    FROM notes
                    WHERE notes.owner_id = ?1
                      AND notes.status = 'active'
                ),
                last_activity = ?2
             WHERE owner_id = ?1;",
            params![owner, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<UserProfile> {
    Ok(UserProfile {
        owner: row.get("owner_id")?,
        username: row.get("username")?,
        first_name: row.get("first_name")?,
        joined_at: millis_to_utc(row.get("joined_at")?, "profiles.joined_at")?,
        total_notes: to_count(row.get("total_notes")?)?,
        last_activity: millis_to_utc(row.get("last_activity")?, "profiles.last_activity")?,
    })
}

fn millis_to_utc(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
