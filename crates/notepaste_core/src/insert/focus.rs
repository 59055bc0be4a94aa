//! Focus tracking context for insertion.
//!
//! # Responsibility
//! - Remember the most recently focused page field without owning it.
//! - Route insertions to that field, refusing stale or detached targets.
//!
//! # Invariants
//! - Only weak references are stored; the page owns element lifetimes.
//! - The picker's own search box is never tracked.

use super::target::{EditableElement, ElementHandle, ElementOrigin, InsertMode, Insertable};
use super::InsertError;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Tracks the last qualifying focus target.
#[derive(Debug, Default)]
pub struct FocusTracker {
    current: Option<Weak<RefCell<EditableElement>>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a focus event. Returns whether the element is now tracked.
    pub fn on_focus(&mut self, element: &ElementHandle) -> bool {
        let origin = element.borrow().origin;
        if origin == ElementOrigin::PickerInput {
            return false;
        }
        self.current = Some(Rc::downgrade(element));
        debug!(
            "event=focus_track module=insert status=ok kind={:?}",
            element.borrow().target.kind()
        );
        true
    }

    /// Returns the tracked element if it is still alive and attached.
    pub fn current_target(&self) -> Option<ElementHandle> {
        self.current
            .as_ref()
            .and_then(Weak::upgrade)
            .filter(|element| element.borrow().attached)
    }

    /// Inserts `value` into the tracked element.
    ///
    /// # Errors
    /// - `InsertError::NoTarget` when nothing usable is tracked.
    pub fn insert(&self, value: &str, mode: InsertMode) -> Result<(), InsertError> {
        let element = self.require_target("insert")?;
        element.borrow_mut().target.insert(value, mode);
        debug!(
            "event=text_insert module=insert status=ok mode={:?} chars={}",
            mode,
            value.chars().count()
        );
        Ok(())
    }

    /// Moves focus back to the tracked element.
    pub fn restore_focus(&self) -> Result<(), InsertError> {
        let element = self.require_target("restore_focus")?;
        element.borrow_mut().focused = true;
        Ok(())
    }

    fn require_target(&self, action: &'static str) -> Result<ElementHandle, InsertError> {
        self.current_target().ok_or_else(|| {
            warn!("event=text_insert module=insert status=aborted action={action} reason=no_target");
            InsertError::NoTarget
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FocusTracker;
    use crate::insert::target::{EditableElement, ElementOrigin, InsertMode};
    use crate::insert::InsertError;

    #[test]
    fn picker_input_focus_is_ignored() {
        let mut tracker = FocusTracker::new();
        let page = EditableElement::plain("").into_handle();
        let picker = EditableElement::plain("")
            .with_origin(ElementOrigin::PickerInput)
            .into_handle();

        assert!(tracker.on_focus(&page));
        assert!(!tracker.on_focus(&picker));
        let current = tracker.current_target().expect("page field should stay tracked");
        assert!(std::rc::Rc::ptr_eq(&current, &page));
    }

    #[test]
    fn dropped_or_detached_target_is_no_target() {
        let mut tracker = FocusTracker::new();
        let field = EditableElement::plain("x").into_handle();
        tracker.on_focus(&field);

        field.borrow_mut().attached = false;
        assert_eq!(
            tracker.insert("y", InsertMode::Append),
            Err(InsertError::NoTarget)
        );

        field.borrow_mut().attached = true;
        drop(field);
        assert!(tracker.current_target().is_none());
        assert_eq!(tracker.restore_focus(), Err(InsertError::NoTarget));
    }
}
