//! Per-user session storage with per-key mutual exclusion.

use crate::capture::session::CaptureSession;
use crate::model::note::OwnerId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, lockable session of one user.
pub type SessionHandle = Arc<Mutex<CaptureSession>>;

/// Capability interface over capture-session state.
///
/// Implementations hand out one handle per owner; holding the handle's lock
/// serializes transitions of that owner while other owners stay independent.
pub trait SessionStore: Send + Sync {
    /// Returns the owner's session handle, creating an immediate session on
    /// first use.
    fn handle(&self, owner: OwnerId) -> SessionHandle;

    /// Returns a snapshot of the owner's session.
    fn get(&self, owner: OwnerId) -> CaptureSession {
        self.handle(owner).lock().clone()
    }

    /// Replaces the owner's session.
    fn put(&self, owner: OwnerId, session: CaptureSession) {
        debug_assert_eq!(session.owner(), owner, "session stored under foreign owner");
        *self.handle(owner).lock() = session;
    }
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<OwnerId, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owners with a materialized session.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops idle immediate-mode sessions nobody currently holds.
    ///
    /// Returns how many sessions were removed.
    pub fn prune_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            handle
                .try_lock()
                .map_or(true, |session| session.is_buffering())
        });
        before - self.sessions.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn handle(&self, owner: OwnerId) -> SessionHandle {
        let entry = self
            .sessions
            .entry(owner)
            .or_insert_with(|| Arc::new(Mutex::new(CaptureSession::new(owner))));
        Arc::clone(entry.value())
    }
}
