//! Single-writer operation queue for note mutations.
//!
//! # Invariants
//! - Operations run strictly one at a time, in lock acquisition order.
//! - An operation's gateway write completes before the next one reads, so
//!   back-to-back delete/reorder/rename calls cannot lose updates.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteResult;
use crate::service::naming::{spawn_auto_name, NameSuggester};
use crate::service::note_service::NoteService;
use crate::store::StoreGateway;
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

/// Cloneable handle to a serialized note service.
pub struct NoteQueue<S: StoreGateway> {
    inner: Arc<Mutex<NoteService<S>>>,
}

impl<S: StoreGateway> Clone for NoteQueue<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Result of a create that may have started a naming request.
pub struct CreatedNote {
    pub note: Note,
    /// Present when auto-naming was started; yields whether it renamed.
    pub naming: Option<JoinHandle<bool>>,
}

impl<S: StoreGateway> NoteQueue<S> {
    pub fn new(service: NoteService<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Runs one operation with exclusive access to the service.
    pub fn run<T>(&self, op: impl FnOnce(&mut NoteService<S>) -> NoteResult<T>) -> NoteResult<T> {
        let mut guard = self.lock();
        op(&mut *guard)
    }

    /// Bumps usage metadata after a picker or popup insertion.
    pub fn record_usage(&self, id: NoteId) -> NoteResult<Note> {
        self.run(|service| service.record_usage(id))
    }

    fn lock(&self) -> MutexGuard<'_, NoteService<S>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            // Gateway batches are all-or-nothing, stored state survives a panic.
            warn!("event=queue_lock module=queue status=recovered reason=poisoned");
            poisoned.into_inner()
        })
    }
}

impl<S: StoreGateway + Send + 'static> NoteQueue<S> {
    /// Creates a note and, when enabled, requests a generated name.
    ///
    /// Naming runs only for notes created without an explicit name and with
    /// `autonameSelection` on. An unreadable settings document skips naming
    /// but never fails the create. Returns `Ok(None)` for blank text.
    pub fn create_note_with_naming(
        &self,
        text: &str,
        name: Option<&str>,
        suggester: Arc<dyn NameSuggester>,
    ) -> NoteResult<Option<CreatedNote>> {
        let Some(note) = self.run(|service| service.create_note(text, name))? else {
            return Ok(None);
        };

        let wants_name = name.map_or(true, |value| value.trim().is_empty());
        if !wants_name {
            return Ok(Some(CreatedNote { note, naming: None }));
        }
        let settings = match self.run(|service| service.settings()) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "event=note_autoname module=queue status=skipped id={} error={}",
                    note.id, err
                );
                return Ok(Some(CreatedNote { note, naming: None }));
            }
        };
        let naming = settings.autoname_selection.then(|| {
            spawn_auto_name(
                self.clone(),
                note.id,
                note.text.clone(),
                settings.key.clone(),
                suggester,
            )
        });
        Ok(Some(CreatedNote { note, naming }))
    }
}
