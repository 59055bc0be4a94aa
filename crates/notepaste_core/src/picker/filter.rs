//! Note matching for the inline picker.
//!
//! Typed queries filter by name prefix; Enter commits by name substring.
//! Both are case-insensitive.

use crate::model::note::Note;

/// Notes shown when a typed query matches nothing.
pub const FALLBACK_RESULT_COUNT: usize = 5;

/// Result list for one typed query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterResult {
    pub notes: Vec<Note>,
    /// Set when no name matched and the first notes are shown instead.
    pub is_fallback: bool,
}

/// Filters `notes` (collection order) by case-insensitive name prefix.
///
/// Zero matches fall back to the first [`FALLBACK_RESULT_COUNT`] notes.
pub fn filter_by_prefix(notes: &[Note], query: &str) -> FilterResult {
    let needle = query.to_lowercase();
    let matched: Vec<Note> = notes
        .iter()
        .filter(|note| note.name.to_lowercase().starts_with(needle.as_str()))
        .cloned()
        .collect();

    if matched.is_empty() {
        return FilterResult {
            notes: notes.iter().take(FALLBACK_RESULT_COUNT).cloned().collect(),
            is_fallback: true,
        };
    }
    FilterResult {
        notes: matched,
        is_fallback: false,
    }
}

/// First note whose name contains `query`, case-insensitive.
pub fn find_by_substring<'a>(notes: &'a [Note], query: &str) -> Option<&'a Note> {
    let needle = query.to_lowercase();
    notes
        .iter()
        .find(|note| note.name.to_lowercase().contains(needle.as_str()))
}
