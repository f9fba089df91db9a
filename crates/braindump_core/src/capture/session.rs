//! Pure capture-session transitions.
//!
//! # Invariants
//! - `buffer` is non-empty only while `mode == Buffering`.
//! - `open` always leaves an empty buffer, discarding abandoned texts.
//! - `close` from `Buffering` always leaves `Immediate` with an empty buffer.

use crate::model::note::OwnerId;
use serde::{Deserialize, Serialize};

/// Capture routing mode for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Every text is analyzed and persisted on arrival.
    #[default]
    Immediate,
    /// Texts are collected until the session is closed.
    Buffering,
}

/// Result of routing one text through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingest {
    /// Text was appended; carries the new buffer length.
    Buffered(usize),
    /// Session is immediate; the caller must analyze and persist the text.
    Immediate(String),
}

/// Result of closing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Close {
    /// No buffering session was active; state unchanged.
    NotActive,
    /// Session closed without any captured text.
    Empty,
    /// Session closed; texts are returned in capture order for flushing.
    Flush(Vec<String>),
}

/// Transient per-user capture state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSession {
    owner: OwnerId,
    mode: CaptureMode,
    buffer: Vec<String>,
}

impl CaptureSession {
    /// Creates the implicit immediate-mode session of a user.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            mode: CaptureMode::Immediate,
            buffer: Vec::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    pub fn is_buffering(&self) -> bool {
        self.mode == CaptureMode::Buffering
    }

    /// Enters buffering mode with an empty buffer.
    ///
    /// Returns how many texts from an abandoned session were discarded.
    pub fn open(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        self.mode = CaptureMode::Buffering;
        discarded
    }

    /// Routes one raw text according to the current mode.
    pub fn ingest(&mut self, text: impl Into<String>) -> Ingest {
        let text = text.into();
        match self.mode {
            CaptureMode::Buffering => {
                self.buffer.push(text);
                Ingest::Buffered(self.buffer.len())
            }
            CaptureMode::Immediate => {
                debug_assert!(self.buffer.is_empty(), "immediate session holds a buffer");
                Ingest::Immediate(text)
            }
        }
    }

    /// Leaves buffering mode, handing over buffered texts.
    pub fn close(&mut self) -> Close {
        match self.mode {
            CaptureMode::Immediate => Close::NotActive,
            CaptureMode::Buffering => {
                self.mode = CaptureMode::Immediate;
                let texts = std::mem::take(&mut self.buffer);
                if texts.is_empty() {
                    Close::Empty
                } else {
                    Close::Flush(texts)
                }
            }
        }
    }
}
