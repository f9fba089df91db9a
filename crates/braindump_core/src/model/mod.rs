//! Domain model for captured notes and their analysis.
//!
//! # Responsibility
//! - Define canonical data structures used by analysis, capture and storage.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is represented by a `Deleted` status, not row removal.

pub mod analysis;
pub mod note;
pub mod profile;
