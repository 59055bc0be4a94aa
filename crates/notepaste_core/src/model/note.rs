//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted snippet record shared by popup, manager page and
//!   inline picker.
//! - Provide naming and timestamp helpers used by every write path.
//!
//! # Invariants
//! - `id` is assigned from the persisted counter and never reused, except
//!   after a full collection wipe.
//! - `name` is never blank once a note is persisted.
//! - `display_order` is dense (`0..N`) across live notes after reindexing.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable note identifier assigned from `noteCounter`.
pub type NoteId = u64;

/// Full persisted collection, serialized as an object keyed by id string.
pub type NoteCollection = BTreeMap<NoteId, Note>;

/// Timestamp layout used for `created_at`/`updated_at`.
///
/// Lexicographic order of this layout matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One stored text snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Snippet body inserted into pages.
    pub text: String,
    /// Display label. Defaults to `Note {id+1}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Storage position. Rendering direction is a presentation concern.
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

impl Note {
    /// Creates a note stamped with the current local time.
    ///
    /// A blank or missing `name` falls back to [`default_note_name`].
    pub fn new(id: NoteId, text: impl Into<String>, name: Option<&str>) -> Self {
        let now = now_timestamp();
        Self {
            id,
            text: text.into(),
            name: resolve_note_name(id, name),
            created_at: now.clone(),
            updated_at: now,
            display_order: 0,
            usage_count: 0,
            last_used_at: None,
        }
    }

    /// Parses `updated_at`, returning `None` for legacy or foreign formats.
    pub fn updated_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.updated_at.as_str(), TIMESTAMP_FORMAT).ok()
    }

    /// Refreshes `updated_at` to the current local time.
    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }
}

/// Default label for a note without a user-provided name.
pub fn default_note_name(id: NoteId) -> String {
    format!("Note {}", id + 1)
}

/// Returns the trimmed `name`, or the default label when blank/absent.
pub fn resolve_note_name(id: NoteId, name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default_note_name(id),
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{default_note_name, resolve_note_name, Note, NoteCollection};

    #[test]
    fn blank_name_falls_back_to_one_based_label() {
        assert_eq!(resolve_note_name(0, None), "Note 1");
        assert_eq!(resolve_note_name(4, Some("   ")), "Note 5");
        assert_eq!(resolve_note_name(4, Some(" Sig ")), "Sig");
        assert_eq!(default_note_name(9), "Note 10");
    }

    #[test]
    fn new_note_timestamp_is_parseable() {
        let note = Note::new(2, "hello", None);
        assert!(note.updated_at_parsed().is_some());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn collection_serializes_with_string_keys_and_camel_case_fields() {
        let mut collection = NoteCollection::new();
        let mut note = Note::new(3, "body", Some("Greeting"));
        note.display_order = 1;
        collection.insert(note.id, note);

        let value = serde_json::to_value(&collection).expect("collection should serialize");
        let entry = &value["3"];
        assert_eq!(entry["displayOrder"], 1);
        assert_eq!(entry["name"], "Greeting");
        assert!(entry.get("lastUsedAt").is_none());

        let back: NoteCollection =
            serde_json::from_value(value).expect("collection should deserialize");
        assert_eq!(back.get(&3).map(|n| n.text.as_str()), Some("body"));
    }

    #[test]
    fn missing_optional_fields_default_on_read() {
        let raw = serde_json::json!({ "id": 7, "text": "legacy" });
        let note: Note = serde_json::from_value(raw).expect("legacy note should parse");
        assert_eq!(note.display_order, 0);
        assert_eq!(note.usage_count, 0);
        assert!(note.name.is_empty());
    }
}
