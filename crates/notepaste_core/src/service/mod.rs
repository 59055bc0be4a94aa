//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into surface-level operations.
//! - Keep display-order maintenance, write serialization and auto-naming out
//!   of the repository.

pub mod naming;
pub mod note_service;
pub mod queue;
pub mod reorder;
