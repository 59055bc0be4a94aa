//! Domain model for stored snippets and user settings.
//!
//! # Responsibility
//! - Define canonical data structures persisted through the store gateway.
//! - Keep serialized field names aligned with the extension storage schema.
//!
//! # Invariants
//! - Every note is identified by a counter-assigned `NoteId`.
//! - Settings reads never fail on missing fields.

pub mod note;
pub mod settings;
