//! Note repository over the store gateway.
//!
//! # Responsibility
//! - Own create/update/delete/clear over the persisted note collection.
//! - Keep `notes` and `noteCounter` consistent from the caller's view.
//!
//! # Invariants
//! - A create writes collection and counter in one gateway batch and bumps
//!   the counter exactly once.
//! - Ids are never reused: the next id is never below `max(id) + 1`, even if
//!   the stored counter is missing or behind. `clear_all` is the only reset.
//! - Deletes never renumber; gap closure belongs to the reorder engine.
//! - Every mutation returns only after its write succeeded.

use crate::model::note::{
    default_note_name, now_timestamp, resolve_note_name, Note, NoteCollection, NoteId,
};
use crate::model::settings::Settings;
use crate::store::{StoreError, StoreGateway, StoreKey};
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NoteResult<T> = Result<T, NoteError>;

/// Errors from note repository and reorder operations.
#[derive(Debug)]
pub enum NoteError {
    /// Referenced note id is not in the collection.
    NotFound(NoteId),
    /// Store gateway read or write was rejected.
    Persistence(StoreError),
    /// Stored document does not have the expected shape.
    InvalidData(String),
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored note data: {message}"),
        }
    }
}

impl Error for NoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StoreError> for NoteError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

/// Note collection repository generic over the store backend.
#[derive(Debug)]
pub struct NoteRepository<S: StoreGateway> {
    store: S,
}

impl<S: StoreGateway> NoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// First-load check.
    ///
    /// Writes counter `0`, default settings and `isInstalled=true` when the
    /// install marker is absent. Returns whether this call performed the
    /// install. Existing notes are left untouched.
    pub fn bootstrap(&mut self) -> NoteResult<bool> {
        let installed = self
            .store
            .get(StoreKey::IsInstalled)?
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        if installed {
            return Ok(false);
        }

        let mut entries = vec![(StoreKey::IsInstalled, Value::Bool(true))];
        if self.store.get(StoreKey::NoteCounter)?.is_none() {
            entries.push((StoreKey::NoteCounter, json!(0)));
        }
        if self.store.get(StoreKey::Settings)?.is_none() {
            entries.push((StoreKey::Settings, encode(&Settings::default())?));
        }
        self.store.set_many(entries)?;
        info!("event=store_bootstrap module=repo status=ok");
        Ok(true)
    }

    /// Loads the collection keyed by id.
    ///
    /// Notes stored without a name get their default label in memory.
    pub fn load_collection(&self) -> NoteResult<NoteCollection> {
        let Some(value) = self.store.get(StoreKey::Notes)? else {
            return Ok(NoteCollection::new());
        };
        let mut collection: NoteCollection = serde_json::from_value(value)
            .map_err(|err| NoteError::InvalidData(format!("`notes`: {err}")))?;
        for note in collection.values_mut() {
            if note.name.trim().is_empty() {
                note.name = default_note_name(note.id);
            }
        }
        Ok(collection)
    }

    /// Returns notes sorted ascending by `display_order` (ties by id).
    pub fn load_all(&self) -> NoteResult<Vec<Note>> {
        Ok(sorted_by_display_order(self.load_collection()?))
    }

    pub fn get(&self, id: NoteId) -> NoteResult<Option<Note>> {
        Ok(self.load_collection()?.remove(&id))
    }

    /// Next id to assign.
    pub fn counter(&self) -> NoteResult<NoteId> {
        let collection = self.load_collection()?;
        self.next_id(&collection)
    }

    /// Creates a note as the most recent entry.
    ///
    /// Returns `Ok(None)` without writing when `text` is blank.
    pub fn create(&mut self, text: &str, name: Option<&str>) -> NoteResult<Option<Note>> {
        if text.trim().is_empty() {
            debug!("event=note_create module=repo status=skipped reason=blank_text");
            return Ok(None);
        }

        let mut collection = self.load_collection()?;
        let id = self.next_id(&collection)?;
        for existing in collection.values_mut() {
            existing.display_order += 1;
        }
        let note = Note::new(id, text, name);
        collection.insert(id, note.clone());

        self.store.set_many(vec![
            (StoreKey::Notes, encode(&collection)?),
            (StoreKey::NoteCounter, json!(id + 1)),
        ])?;
        info!(
            "event=note_create module=repo status=ok id={} total={}",
            id,
            collection.len()
        );
        Ok(Some(note))
    }

    /// Replaces text and name of an existing note, keeping its position.
    pub fn update(&mut self, id: NoteId, text: &str, name: Option<&str>) -> NoteResult<Note> {
        let mut collection = self.load_collection()?;
        let note = collection.get_mut(&id).ok_or(NoteError::NotFound(id))?;
        note.text = text.to_string();
        note.name = resolve_note_name(id, name);
        note.touch();
        let updated = note.clone();

        self.save_collection(&collection)?;
        info!("event=note_update module=repo status=ok id={id}");
        Ok(updated)
    }

    /// Removes one note. Returns `false` without writing when absent.
    pub fn delete(&mut self, id: NoteId) -> NoteResult<bool> {
        let mut collection = self.load_collection()?;
        if collection.remove(&id).is_none() {
            debug!("event=note_delete module=repo status=skipped reason=not_found id={id}");
            return Ok(false);
        }

        self.save_collection(&collection)?;
        info!(
            "event=note_delete module=repo status=ok id={} total={}",
            id,
            collection.len()
        );
        Ok(true)
    }

    /// Empties the collection and resets the id counter to `0`.
    pub fn clear_all(&mut self) -> NoteResult<()> {
        self.store.set_many(vec![
            (StoreKey::Notes, encode(&NoteCollection::new())?),
            (StoreKey::NoteCounter, json!(0)),
        ])?;
        info!("event=note_clear_all module=repo status=ok");
        Ok(())
    }

    /// Writes a full collection in one gateway call.
    pub fn save_collection(&mut self, collection: &NoteCollection) -> NoteResult<()> {
        self.store.set(StoreKey::Notes, encode(collection)?)?;
        Ok(())
    }

    /// Applies a late-arriving name only if the note still exists.
    ///
    /// A blank name is ignored. Returns whether the note was renamed.
    pub fn patch_name_if_present(&mut self, id: NoteId, name: &str) -> NoteResult<bool> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut collection = self.load_collection()?;
        let Some(note) = collection.get_mut(&id) else {
            debug!("event=note_rename module=repo status=skipped reason=not_found id={id}");
            return Ok(false);
        };
        note.name = trimmed.to_string();
        self.save_collection(&collection)?;
        info!("event=note_rename module=repo status=ok id={id}");
        Ok(true)
    }

    /// Bumps usage metadata after a note was inserted somewhere.
    pub fn record_usage(&mut self, id: NoteId) -> NoteResult<Note> {
        let mut collection = self.load_collection()?;
        let note = collection.get_mut(&id).ok_or(NoteError::NotFound(id))?;
        note.usage_count = note.usage_count.saturating_add(1);
        note.last_used_at = Some(now_timestamp());
        let used = note.clone();

        self.save_collection(&collection)?;
        debug!(
            "event=note_usage module=repo status=ok id={} usage_count={}",
            id, used.usage_count
        );
        Ok(used)
    }

    /// Reads settings, falling back to defaults when absent.
    pub fn load_settings(&self) -> NoteResult<Settings> {
        match self.store.get(StoreKey::Settings)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|err| NoteError::InvalidData(format!("`settings`: {err}"))),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) -> NoteResult<()> {
        self.store.set(StoreKey::Settings, encode(settings)?)?;
        Ok(())
    }

    fn next_id(&self, collection: &NoteCollection) -> NoteResult<NoteId> {
        let stored = match self.store.get(StoreKey::NoteCounter)? {
            Some(value) => value.as_u64().ok_or_else(|| {
                NoteError::InvalidData(format!("`noteCounter` is not an unsigned integer: {value}"))
            })?,
            None => 0,
        };
        let floor = collection.keys().next_back().map_or(0, |max| max + 1);
        if stored < floor {
            warn!(
                "event=note_counter module=repo status=repaired stored={} floor={}",
                stored, floor
            );
        }
        Ok(stored.max(floor))
    }
}

/// Sorts a collection into storage order.
pub fn sorted_by_display_order(collection: NoteCollection) -> Vec<Note> {
    let mut notes: Vec<Note> = collection.into_values().collect();
    notes.sort_by_key(|note| (note.display_order, note.id));
    notes
}

fn encode<T: serde::Serialize>(value: &T) -> NoteResult<Value> {
    serde_json::to_value(value).map_err(|err| NoteError::Persistence(StoreError::from(err)))
}
