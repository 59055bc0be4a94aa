//! Repository layer over the store gateway.
//!
//! # Responsibility
//! - Own note collection persistence and the id counter.
//! - Isolate document encoding from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   persistence errors.

pub mod note_repo;
