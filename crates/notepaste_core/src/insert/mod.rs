//! Insertion engine for page fields.
//!
//! # Responsibility
//! - Model plain value fields and rich editable regions as one tagged target.
//! - Track the last focused field and insert snippet text into it.
//!
//! # Invariants
//! - Insertion never panics on a missing target; it returns `NoTarget`.
//! - Programmatic plain-field changes always surface an input notification.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod focus;
pub mod target;

/// Insertion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// No tracked element, or the tracked element left the page.
    NoTarget,
}

impl Display for InsertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTarget => write!(f, "no focused field to insert into"),
        }
    }
}

impl Error for InsertError {}
