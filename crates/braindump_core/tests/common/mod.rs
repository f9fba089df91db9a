//! In-memory store doubles shared by integration tests.

#![allow(dead_code)]

use braindump_core::repo::note_repo::{GroupField, NoteSort};
use braindump_core::{
    DisplayInfo, Note, NoteFilter, NoteId, NoteQuery, NoteRepository, OwnerId, ProfileRepository,
    RepoError, RepoResult, UserProfile,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
struct NoteState {
    notes: Vec<Note>,
    failing_texts: HashSet<String>,
}

/// Note store backed by a shared vector; clones share state.
#[derive(Clone, Default)]
pub struct MemoryNotes {
    state: Arc<Mutex<NoteState>>,
}

impl MemoryNotes {
    /// Makes every insert of `text` fail with `RepoError::Unavailable`.
    pub fn fail_on(&self, text: &str) {
        self.state.lock().failing_texts.insert(text.to_string());
    }

    pub fn all(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    pub fn texts(&self, owner: OwnerId) -> Vec<String> {
        self.state
            .lock()
            .notes
            .iter()
            .filter(|note| note.owner == owner)
            .map(|note| note.raw_text.clone())
            .collect()
    }
}

impl NoteRepository for MemoryNotes {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        let mut state = self.state.lock();
        if state.failing_texts.contains(&note.raw_text) {
            return Err(RepoError::Unavailable("injected failure".to_string()));
        }
        state.notes.push(note.clone());
        Ok(note.id)
    }

    fn find_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>> {
        let state = self.state.lock();
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .filter(|note| query.filter.matches(note))
            .cloned()
            .collect();
        notes.sort_by_key(|note| note.created_at);
        if query.sort == NoteSort::NewestFirst {
            notes.reverse();
        }
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(notes
            .into_iter()
            .skip(query.offset as usize)
            .take(limit)
            .collect())
    }

    fn count_active(&self, owner: OwnerId) -> RepoResult<u64> {
        let filter = NoteFilter::active(owner);
        let state = self.state.lock();
        Ok(state.notes.iter().filter(|note| filter.matches(note)).count() as u64)
    }

    fn group_count(&self, field: GroupField, filter: &NoteFilter) -> RepoResult<Vec<(String, u64)>> {
        let state = self.state.lock();
        let mut counts: HashMap<String, u64> = HashMap::new();
        for note in state.notes.iter().filter(|note| filter.matches(note)) {
            let keys = match field {
                GroupField::Category => vec![note.analysis.category.clone()],
                GroupField::Topic => note.analysis.topics.clone(),
                GroupField::Day => vec![note.created_at.format("%Y-%m-%d").to_string()],
            };
            for key in keys {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        let mut groups: Vec<(String, u64)> = counts.into_iter().collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(groups)
    }

    fn delete_all(&self, owner: OwnerId) -> RepoResult<u64> {
        let filter = NoteFilter::active(owner);
        let mut state = self.state.lock();
        let mut deleted = 0;
        for note in state.notes.iter_mut().filter(|note| filter.matches(note)) {
            note.soft_delete();
            deleted += 1;
        }
        Ok(deleted)
    }
}

#[derive(Default)]
struct ProfileState {
    profiles: HashMap<OwnerId, UserProfile>,
    refreshes: Vec<OwnerId>,
    failing: bool,
}

/// Profile store double that records stat refreshes.
#[derive(Clone, Default)]
pub struct MemoryProfiles {
    state: Arc<Mutex<ProfileState>>,
}

impl MemoryProfiles {
    pub fn fail_refreshes(&self) {
        self.state.lock().failing = true;
    }

    pub fn refreshes(&self) -> Vec<OwnerId> {
        self.state.lock().refreshes.clone()
    }
}

impl ProfileRepository for MemoryProfiles {
    fn get_or_create(&self, owner: OwnerId, display: &DisplayInfo) -> RepoResult<UserProfile> {
        let mut state = self.state.lock();
        Ok(state
            .profiles
            .entry(owner)
            .or_insert_with(|| UserProfile::new(owner, display, Utc::now()))
            .clone())
    }

    fn get_profile(&self, owner: OwnerId) -> RepoResult<Option<UserProfile>> {
        Ok(self.state.lock().profiles.get(&owner).cloned())
    }

    fn update_activity_stats(&self, owner: OwnerId) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(RepoError::Unavailable("injected failure".to_string()));
        }
        state.refreshes.push(owner);
        Ok(())
    }
}
