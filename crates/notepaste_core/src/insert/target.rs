//! Editable target model.
//!
//! # Responsibility
//! - Model the two kinds of page fields a snippet can land in.
//! - Apply text insertion with the cursor semantics each kind exposes.
//!
//! # Invariants
//! - Rich region selections are char offsets clamped to the text length.
//! - Every plain field insertion queues exactly one input notification.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

/// How inserted text treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Add at the end (plain) or at the cursor (rich).
    Append,
    /// Drop the trigger char typed just before, then insert.
    ReplaceTrailingChar,
}

/// Shared insertion capability of editable targets.
pub trait Insertable {
    fn insert(&mut self, value: &str, mode: InsertMode);
}

/// Synthesized `input` notification for programmatic value changes.
///
/// Hosts dispatch these as bubbling `input` events so page listeners observe
/// the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNotification {
    pub value: String,
}

/// Single or multi-line form field holding a mutable value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainField {
    value: String,
    notifications: Vec<InputNotification>,
}

impl PlainField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            notifications: Vec::new(),
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Mirrors user typing. Native events already fire for this path.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Drains notifications the host still has to dispatch.
    pub fn take_notifications(&mut self) -> Vec<InputNotification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Insertable for PlainField {
    fn insert(&mut self, value: &str, mode: InsertMode) {
        if mode == InsertMode::ReplaceTrailingChar {
            self.value.pop();
        }
        self.value.push_str(value);
        self.notifications.push(InputNotification {
            value: self.value.clone(),
        });
    }
}

/// Content-editable region with a selection range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichRegion {
    text: String,
    selection: Range<usize>,
}

impl RichRegion {
    /// Creates a region with a collapsed cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Creates a region with a collapsed cursor at `cursor` (char offset).
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        Self::with_selection(text, cursor, cursor)
    }

    /// Creates a region selecting `start..end` (char offsets, any order).
    pub fn with_selection(text: impl Into<String>, start: usize, end: usize) -> Self {
        let mut region = Self::new(text);
        region.select(start, end);
        region
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Caret position, i.e. the selection focus end.
    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.start == self.selection.end
    }

    /// Moves the selection; offsets are clamped and ordered.
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.text.chars().count();
        let (start, end) = (start.min(len), end.min(len));
        self.selection = start.min(end)..start.max(end);
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

impl Insertable for RichRegion {
    fn insert(&mut self, value: &str, mode: InsertMode) {
        let Range { mut start, end } = self.selection.clone();
        match mode {
            // Collapse to the end of the selection, keeping selected text.
            InsertMode::Append => start = end,
            InsertMode::ReplaceTrailingChar => {
                if start == end && start > 0 {
                    start -= 1;
                }
            }
        }

        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        self.text.replace_range(from..to, value);
        let cursor = start + value.chars().count();
        self.selection = cursor..cursor;
    }
}

/// Tagged editable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditableTarget {
    Plain(PlainField),
    Rich(RichRegion),
}

impl EditableTarget {
    /// Current textual content regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(field) => field.value(),
            Self::Rich(region) => region.text(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Plain(_) => FieldKind::Plain,
            Self::Rich(_) => FieldKind::Rich,
        }
    }
}

impl Insertable for EditableTarget {
    fn insert(&mut self, value: &str, mode: InsertMode) {
        match self {
            Self::Plain(field) => field.insert(value, mode),
            Self::Rich(region) => region.insert(value, mode),
        }
    }
}

/// Detected field category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    Rich,
}

/// Input types that hold free text.
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "email", "url", "tel"];

/// Classifies a focused DOM element.
///
/// `input_type` is the `type` attribute of `<input>` elements, if any.
/// Returns `None` for elements snippets cannot be inserted into.
pub fn classify_element(
    tag_name: &str,
    input_type: Option<&str>,
    content_editable: bool,
) -> Option<FieldKind> {
    if content_editable {
        return Some(FieldKind::Rich);
    }
    match tag_name.to_ascii_lowercase().as_str() {
        "textarea" => Some(FieldKind::Plain),
        "input" => {
            let kind = input_type.map_or("text", str::trim).to_ascii_lowercase();
            (kind.is_empty() || TEXT_INPUT_TYPES.contains(&kind.as_str()))
                .then_some(FieldKind::Plain)
        }
        _ => None,
    }
}

/// Who owns an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementOrigin {
    /// Part of the host page.
    #[default]
    Page,
    /// The picker's own ephemeral search box.
    PickerInput,
}

/// Viewport rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One editable element as seen by the content side.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableElement {
    pub target: EditableTarget,
    pub origin: ElementOrigin,
    /// Cleared when the element leaves the document.
    pub attached: bool,
    pub focused: bool,
    pub bounds: Rect,
}

/// Shared handle; the focus tracker only keeps weak references to it.
pub type ElementHandle = Rc<RefCell<EditableElement>>;

impl EditableElement {
    pub fn new(target: EditableTarget) -> Self {
        Self {
            target,
            origin: ElementOrigin::Page,
            attached: true,
            focused: false,
            bounds: Rect::default(),
        }
    }

    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(EditableTarget::Plain(PlainField::new(value)))
    }

    pub fn rich(region: RichRegion) -> Self {
        Self::new(EditableTarget::Rich(region))
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_origin(mut self, origin: ElementOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn into_handle(self) -> ElementHandle {
        Rc::new(RefCell::new(self))
    }
}
