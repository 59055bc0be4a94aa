//! Inline note picker state machine.
//!
//! # Responsibility
//! - Open an ephemeral search box under the tracked field on the trigger key.
//! - Filter notes while typing and insert the chosen note on commit.
//! - Tear the ephemeral UI down on selection, cancel or blur.
//!
//! # Invariants
//! - `Idle -> Open -> Closed`; a closed picker reopens on the next trigger.
//! - Selecting without a usable target is a no-op returning `NoTarget`; the
//!   picker stays open so the user can still browse or cancel.
//! - The search box is detached whenever the picker leaves `Open`.

use super::filter::{filter_by_prefix, find_by_substring, FilterResult};
use super::trigger::KeyInput;
use crate::insert::focus::FocusTracker;
use crate::insert::target::{EditableElement, EditableTarget, ElementHandle, ElementOrigin, Rect};
use crate::insert::InsertError;
use crate::model::note::Note;
use crate::model::settings::{Settings, TriggerBinding};
use log::{debug, info};

/// Width of the ephemeral search box in CSS pixels.
const SEARCH_INPUT_WIDTH: f64 = 240.0;
const SEARCH_INPUT_HEIGHT: f64 = 28.0;

/// Why the picker closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Selected,
    Cancelled,
    Blurred,
}

/// Live picker session.
#[derive(Debug)]
pub struct OpenPicker {
    query: String,
    results: FilterResult,
    search_input: ElementHandle,
    anchored: bool,
}

impl OpenPicker {
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    pub fn results(&self) -> &[Note] {
        &self.results.notes
    }

    pub fn is_fallback(&self) -> bool {
        self.results.is_fallback
    }

    /// The results list is hidden when there is nothing to show.
    pub fn results_visible(&self) -> bool {
        !self.results.notes.is_empty()
    }

    /// Ephemeral search box the host renders and focuses.
    pub fn search_input(&self) -> &ElementHandle {
        &self.search_input
    }

    /// Whether the box is positioned under a tracked field.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }
}

#[derive(Debug)]
pub enum PickerState {
    Idle,
    Open(OpenPicker),
    Closed(CloseReason),
}

/// Observable effect of one picker event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Event does not concern the picker.
    Ignored,
    Opened,
    /// Query changed; carries the number of shown results.
    Filtered(usize),
    /// Note text was inserted into the tracked field.
    Inserted(Note),
    /// Enter found no note containing the query.
    NoMatch,
    Cancelled,
    Blurred,
}

/// Inline picker bound to one note snapshot and trigger binding.
#[derive(Debug)]
pub struct InlinePicker {
    binding: TriggerBinding,
    notes: Vec<Note>,
    state: PickerState,
}

impl InlinePicker {
    pub fn new(settings: &Settings) -> Self {
        Self::with_binding(settings.trigger_binding())
    }

    pub fn with_binding(binding: TriggerBinding) -> Self {
        Self {
            binding,
            notes: Vec::new(),
            state: PickerState::Idle,
        }
    }

    /// Replaces the note snapshot (collection order).
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    /// Applies a settings change, e.g. the trigger flag.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.binding = settings.trigger_binding();
    }

    pub fn binding(&self) -> TriggerBinding {
        self.binding
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open(_))
    }

    /// Open session, if any.
    pub fn session(&self) -> Option<&OpenPicker> {
        match &self.state {
            PickerState::Open(open) => Some(open),
            _ => None,
        }
    }

    /// Handles a keystroke seen either on the page or in the search box.
    pub fn on_key(
        &mut self,
        input: &KeyInput,
        focus: &FocusTracker,
    ) -> Result<PickerOutcome, InsertError> {
        let Some(open) = self.session() else {
            if self.binding.matches(input) {
                return Ok(self.open(focus));
            }
            return Ok(PickerOutcome::Ignored);
        };
        let query_empty = open.query.is_empty();

        if input.is("Enter") {
            return self.commit(focus);
        }
        if input.is("Escape") || (input.is("Backspace") && query_empty) {
            return Ok(self.cancel(focus));
        }
        Ok(PickerOutcome::Ignored)
    }

    /// Updates the query from the search box `input` event.
    pub fn set_query(&mut self, query: &str) -> PickerOutcome {
        let results = filter_by_prefix(&self.notes, query);
        let PickerState::Open(open) = &mut self.state else {
            return PickerOutcome::Ignored;
        };
        open.query = query.to_string();
        if let EditableTarget::Plain(field) = &mut open.search_input.borrow_mut().target {
            field.set_value(query);
        }
        open.results = results;
        debug!(
            "event=picker_filter module=picker status=ok shown={} fallback={}",
            open.results.notes.len(),
            open.results.is_fallback
        );
        PickerOutcome::Filtered(open.results.notes.len())
    }

    /// Inserts the result at `index` (mouse selection).
    pub fn select(
        &mut self,
        index: usize,
        focus: &FocusTracker,
    ) -> Result<PickerOutcome, InsertError> {
        let Some(note) = self
            .session()
            .and_then(|open| open.results.notes.get(index))
            .cloned()
        else {
            return Ok(PickerOutcome::Ignored);
        };
        self.insert_and_close(note, focus)
    }

    /// Enter: inserts the first note whose name contains the query.
    pub fn commit(&mut self, focus: &FocusTracker) -> Result<PickerOutcome, InsertError> {
        let Some(open) = self.session() else {
            return Ok(PickerOutcome::Ignored);
        };
        let found = find_by_substring(&self.notes, open.query.as_str()).cloned();
        match found {
            Some(note) => self.insert_and_close(note, focus),
            None => {
                debug!("event=picker_commit module=picker status=no_match");
                Ok(PickerOutcome::NoMatch)
            }
        }
    }

    /// Search box lost focus.
    pub fn on_blur(&mut self) -> PickerOutcome {
        if !self.is_open() {
            return PickerOutcome::Ignored;
        }
        self.close(CloseReason::Blurred);
        PickerOutcome::Blurred
    }

    fn open(&mut self, focus: &FocusTracker) -> PickerOutcome {
        let target = focus.current_target();
        let bounds = target.as_ref().map(|element| {
            let mut element = element.borrow_mut();
            element.focused = false;
            element.bounds
        });

        let anchor = bounds.map_or(Rect::default(), |bounds| Rect {
            left: bounds.left,
            top: bounds.bottom(),
            width: SEARCH_INPUT_WIDTH,
            height: SEARCH_INPUT_HEIGHT,
        });
        let mut search_input = EditableElement::plain("")
            .with_origin(ElementOrigin::PickerInput)
            .with_bounds(anchor);
        search_input.focused = true;

        self.state = PickerState::Open(OpenPicker {
            query: String::new(),
            results: filter_by_prefix(&self.notes, ""),
            search_input: search_input.into_handle(),
            anchored: target.is_some(),
        });
        info!(
            "event=picker_open module=picker status=ok anchored={} notes={}",
            target.is_some(),
            self.notes.len()
        );
        PickerOutcome::Opened
    }

    fn insert_and_close(
        &mut self,
        note: Note,
        focus: &FocusTracker,
    ) -> Result<PickerOutcome, InsertError> {
        focus.insert(note.text.as_str(), self.binding.insertion_mode())?;
        focus.restore_focus()?;
        self.close(CloseReason::Selected);
        Ok(PickerOutcome::Inserted(note))
    }

    fn cancel(&mut self, focus: &FocusTracker) -> PickerOutcome {
        if let Some(target) = focus.current_target() {
            target.borrow_mut().focused = true;
        }
        self.close(CloseReason::Cancelled);
        PickerOutcome::Cancelled
    }

    fn close(&mut self, reason: CloseReason) {
        if let PickerState::Open(open) = &self.state {
            let mut input = open.search_input.borrow_mut();
            input.attached = false;
            input.focused = false;
        }
        self.state = PickerState::Closed(reason);
        info!("event=picker_close module=picker status=ok reason={reason:?}");
    }
}
