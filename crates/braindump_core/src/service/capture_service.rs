//! Capture use-case service.
//!
//! # Responsibility
//! - Drive the per-user capture session through open, ingest and close.
//! - Perform the analysis, persistence and profile refresh each transition
//!   asks for.
//!
//! # Invariants
//! - Every transition of one owner runs under that owner's session lock,
//!   including the persistence it triggers.
//! - A batch flush is best effort: one failed insert never aborts the rest.
//! - Profile stat refresh failures are logged and never fail a capture.
//! - Logs carry counts and ids only, never raw note text.

use crate::aggregate::{category_counts, CountEntry};
use crate::analysis::Analyzer;
use crate::capture::session::{CaptureSession, Close, Ingest};
use crate::capture::store::SessionStore;
use crate::model::analysis::Analysis;
use crate::model::note::{Note, OwnerId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of an immediate capture.
#[derive(Debug)]
pub enum CaptureError {
    /// The analyzed note could not be stored.
    Persist(RepoError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "failed to persist captured note: {err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<RepoError> for CaptureError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

/// Outcome of entering buffering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenReport {
    /// Texts from an abandoned earlier capture that were dropped.
    pub discarded: usize,
}

/// Outcome of one ingested text.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestReport {
    /// Text was appended to the buffer, which now holds `buffered` texts.
    Buffered { buffered: usize },
    /// Text was analyzed and stored right away.
    Saved { note: Note },
}

/// Totals of one flushed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FlushReport {
    pub analyzed: usize,
    pub persisted: usize,
    pub failed: usize,
    /// Category counts of the batch, most frequent first.
    pub breakdown: Vec<CountEntry>,
}

/// Outcome of leaving buffering mode.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseReport {
    /// No capture was open.
    NotActive,
    /// Capture was open but nothing was sent.
    Empty,
    Flushed(FlushReport),
}

/// Capture facade over a session store, the analyzer and note storage.
pub struct CaptureService<S, N, P>
where
    S: SessionStore,
    N: NoteRepository,
    P: ProfileRepository,
{
    sessions: S,
    analyzer: Analyzer,
    notes: N,
    profiles: P,
}

impl<S, N, P> CaptureService<S, N, P>
where
    S: SessionStore,
    N: NoteRepository,
    P: ProfileRepository,
{
    pub fn new(sessions: S, analyzer: Analyzer, notes: N, profiles: P) -> Self {
        Self {
            sessions,
            analyzer,
            notes,
            profiles,
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Snapshot of the owner's current session.
    pub fn session(&self, owner: OwnerId) -> CaptureSession {
        self.sessions.get(owner)
    }

    /// Enters buffering mode, dropping whatever an earlier capture left.
    pub fn open_capture(&self, owner: OwnerId) -> OpenReport {
        let handle = self.sessions.handle(owner);
        let mut session = handle.lock();
        let discarded = session.open();
        info!("event=capture_open module=capture status=ok owner={owner} discarded={discarded}");
        OpenReport { discarded }
    }

    /// Buffers `text` or, outside a capture, analyzes and stores it.
    pub fn ingest_text(
        &self,
        owner: OwnerId,
        text: impl Into<String>,
    ) -> Result<IngestReport, CaptureError> {
        let handle = self.sessions.handle(owner);
        let mut session = handle.lock();

        match session.ingest(text) {
            Ingest::Buffered(buffered) => Ok(IngestReport::Buffered { buffered }),
            Ingest::Immediate(text) => {
                let analysis = self.analyzer.analyze(&text);
                let note = Note::new(owner, text, analysis);
                if let Err(err) = self.notes.insert_note(&note) {
                    warn!(
                        "event=capture_save module=capture status=error owner={owner} error={err}"
                    );
                    return Err(CaptureError::Persist(err));
                }
                self.refresh_profile(owner);
                info!(
                    "event=capture_save module=capture status=ok owner={owner} note_uuid={} confidence={:.2}",
                    note.id,
                    note.analysis.confidence
                );
                Ok(IngestReport::Saved { note })
            }
        }
    }

    /// Leaves buffering mode and flushes the buffered texts.
    pub fn close_capture(&self, owner: OwnerId) -> CloseReport {
        let handle = self.sessions.handle(owner);
        let mut session = handle.lock();

        let texts = match session.close() {
            Close::NotActive => return CloseReport::NotActive,
            Close::Empty => {
                info!("event=capture_close module=capture status=empty owner={owner}");
                return CloseReport::Empty;
            }
            Close::Flush(texts) => texts,
        };

        let analyses = self.analyzer.analyze_batch(texts.as_slice());
        let breakdown = category_counts(self.analyzer.lexicon(), &analyses);
        let analyzed = analyses.len();
        let mut failed = 0;

        for (text, analysis) in texts.into_iter().zip(analyses) {
            if !self.persist_one(owner, text, analysis) {
                failed += 1;
            }
        }

        self.refresh_profile(owner);
        let report = FlushReport {
            analyzed,
            persisted: analyzed - failed,
            failed,
            breakdown,
        };
        info!(
            "event=capture_flush module=capture status={} owner={owner} analyzed={} persisted={} failed={}",
            if failed == 0 { "ok" } else { "partial" },
            report.analyzed,
            report.persisted,
            report.failed
        );
        CloseReport::Flushed(report)
    }

    fn persist_one(&self, owner: OwnerId, text: String, analysis: Analysis) -> bool {
        let note = Note::new(owner, text, analysis);
        match self.notes.insert_note(&note) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    "event=capture_flush_item module=capture status=error owner={owner} note_uuid={} error={err}",
                    note.id
                );
                false
            }
        }
    }

    fn refresh_profile(&self, owner: OwnerId) {
        if let Err(err) = self.profiles.update_activity_stats(owner) {
            warn!("event=profile_refresh module=capture status=error owner={owner} error={err}");
        }
    }
}
