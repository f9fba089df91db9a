//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate analysis and repository calls into user-facing operations.
//! - Keep front ends decoupled from storage details.

pub mod capture_service;
pub mod note_service;
