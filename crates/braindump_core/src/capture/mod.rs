//! Capture session state machine.
//!
//! # Responsibility
//! - Decide per user whether incoming text is analyzed now or buffered.
//! - Own the buffered texts between open and close.
//!
//! # Invariants
//! - Transitions are pure on [`CaptureSession`]; I/O happens in the service
//!   layer after the transition completed.
//! - Transitions for one owner are serialized through its session handle.

pub mod session;
pub mod store;
