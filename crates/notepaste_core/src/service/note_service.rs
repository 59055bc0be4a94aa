//! Note use-case service.
//!
//! # Responsibility
//! - Provide the create/update/delete/reorder/sort entry points surfaces call.
//! - Pair repository deletes with gap closure so callers never observe a
//!   sparse `display_order`.
//!
//! # Invariants
//! - Every public mutation leaves `display_order` dense.
//! - A failed write is returned to the caller; nothing is retried silently.

use crate::model::note::{Note, NoteId};
use crate::model::settings::Settings;
use crate::repo::note_repo::{NoteRepository, NoteResult};
use crate::service::reorder::{
    apply_visual_order, close_gaps, is_dense, render_order, sort_by, RenderDirection, SortCriterion,
};
use crate::store::StoreGateway;

/// Note service facade over one repository.
#[derive(Debug)]
pub struct NoteService<S: StoreGateway> {
    repo: NoteRepository<S>,
    direction: RenderDirection,
}

impl<S: StoreGateway> NoteService<S> {
    /// Creates a service for a surface that draws order `0` first.
    pub fn new(store: S) -> Self {
        Self::with_direction(store, RenderDirection::OrderZeroFirst)
    }

    pub fn with_direction(store: S, direction: RenderDirection) -> Self {
        Self {
            repo: NoteRepository::new(store),
            direction,
        }
    }

    pub fn repo(&self) -> &NoteRepository<S> {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut NoteRepository<S> {
        &mut self.repo
    }

    pub fn direction(&self) -> RenderDirection {
        self.direction
    }

    /// Runs the first-load check. See [`NoteRepository::bootstrap`].
    pub fn bootstrap(&mut self) -> NoteResult<bool> {
        self.repo.bootstrap()
    }

    /// Creates one note at the most-recent position.
    pub fn create_note(&mut self, text: &str, name: Option<&str>) -> NoteResult<Option<Note>> {
        let created = self.repo.create(text, name)?;
        // Shifting by one keeps density only if the collection was already
        // dense, which is not the case for stores written by older builds.
        if created.is_some() && !is_dense(&self.repo.load_all()?) {
            close_gaps(&mut self.repo)?;
        }
        Ok(created)
    }

    /// Replaces text/name of one note.
    pub fn update_note(&mut self, id: NoteId, text: &str, name: Option<&str>) -> NoteResult<Note> {
        self.repo.update(id, text, name)
    }

    /// Deletes one note and closes the gap it leaves.
    ///
    /// Returns `false` without writing when the note is already gone.
    pub fn delete_note(&mut self, id: NoteId) -> NoteResult<bool> {
        if !self.repo.delete(id)? {
            return Ok(false);
        }
        close_gaps(&mut self.repo)?;
        Ok(true)
    }

    /// Wipes all notes and resets the id counter.
    pub fn clear_all(&mut self) -> NoteResult<()> {
        self.repo.clear_all()
    }

    /// Notes in storage order.
    pub fn list_notes(&self) -> NoteResult<Vec<Note>> {
        self.repo.load_all()
    }

    /// Notes in the order this surface draws them.
    pub fn visual_notes(&self) -> NoteResult<Vec<Note>> {
        Ok(render_order(self.repo.load_all()?, self.direction))
    }

    /// Persists the on-screen order after a drag ends.
    pub fn reorder(&mut self, visual_ids: &[NoteId]) -> NoteResult<Vec<Note>> {
        apply_visual_order(&mut self.repo, visual_ids, self.direction)
    }

    /// Applies an explicit sort action.
    pub fn sort(&mut self, criterion: SortCriterion) -> NoteResult<Vec<Note>> {
        sort_by(&mut self.repo, criterion, self.direction)
    }

    pub fn patch_name_if_present(&mut self, id: NoteId, name: &str) -> NoteResult<bool> {
        self.repo.patch_name_if_present(id, name)
    }

    pub fn record_usage(&mut self, id: NoteId) -> NoteResult<Note> {
        self.repo.record_usage(id)
    }

    pub fn settings(&self) -> NoteResult<Settings> {
        self.repo.load_settings()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> NoteResult<()> {
        self.repo.save_settings(settings)
    }
}
