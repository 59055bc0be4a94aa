//! Core domain logic for the NotePaste snippet manager.
//! This crate is the single source of truth for note invariants; extension
//! surfaces (popup, quick launch, content side) are thin adapters over it.

pub mod db;
pub mod insert;
pub mod logging;
pub mod message;
pub mod model;
pub mod picker;
pub mod repo;
pub mod service;
pub mod store;

pub use insert::focus::FocusTracker;
pub use insert::target::{
    classify_element, EditableElement, EditableTarget, ElementHandle, ElementOrigin, FieldKind,
    InsertMode, Insertable, PlainField, Rect, RichRegion,
};
pub use insert::InsertError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use message::{handle_message, handle_raw_message, HostMessage, MessageResponse};
pub use model::note::{Note, NoteCollection, NoteId};
pub use model::settings::{Settings, TriggerBinding};
pub use picker::{InlinePicker, KeyInput, PickerOutcome, PickerState};
pub use repo::note_repo::{NoteError, NoteRepository, NoteResult};
pub use service::naming::{spawn_auto_name, NameSuggester, NamingError};
pub use service::note_service::NoteService;
pub use service::queue::{CreatedNote, NoteQueue};
pub use service::reorder::{RenderDirection, SortCriterion};
pub use store::{MemoryStore, SqliteStore, StoreError, StoreGateway, StoreKey};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
