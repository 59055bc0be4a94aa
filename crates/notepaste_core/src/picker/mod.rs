//! Inline note picker opened from a trigger keystroke.
//!
//! # Responsibility
//! - Match the configured trigger binding against host key events.
//! - Filter the note snapshot and hand the chosen text to the focus tracker.

pub mod filter;
pub mod state;
pub mod trigger;

pub use filter::{filter_by_prefix, find_by_substring, FilterResult, FALLBACK_RESULT_COUNT};
pub use state::{CloseReason, InlinePicker, OpenPicker, PickerOutcome, PickerState};
pub use trigger::KeyInput;
