//! Store gateway contracts over the extension key/value schema.
//!
//! # Responsibility
//! - Define the small fixed key set persisted by core.
//! - Abstract the asynchronous browser storage area behind a blocking
//!   gateway that hosts adapt.
//!
//! # Invariants
//! - `set_many` is all-or-nothing: every entry is written or none is.
//! - Values are JSON documents; shape validation belongs to callers.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fixed key schema of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    /// Mapping id(string) -> note.
    Notes,
    /// Next note id.
    NoteCounter,
    /// User settings document.
    Settings,
    /// First-load marker.
    IsInstalled,
}

impl StoreKey {
    /// Persisted key name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::NoteCounter => "noteCounter",
            Self::Settings => "settings",
            Self::IsInstalled => "isInstalled",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by store gateway implementations.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite transport/bootstrap failure.
    Db(DbError),
    /// Stored text is not valid JSON, or a value failed to encode.
    Serialization(serde_json::Error),
    /// Backend refused the operation.
    Rejected(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored document: {err}"),
            Self::Rejected(message) => write!(f, "store rejected operation: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Key/value persistence collaborator.
pub trait StoreGateway {
    /// Reads one key. Missing keys are `Ok(None)`.
    fn get(&self, key: StoreKey) -> StoreResult<Option<Value>>;
    /// Writes all entries atomically.
    fn set_many(&mut self, entries: Vec<(StoreKey, Value)>) -> StoreResult<()>;
    /// Deletes one key. Missing keys are not an error.
    fn remove(&mut self, key: StoreKey) -> StoreResult<()>;

    /// Writes one entry.
    fn set(&mut self, key: StoreKey, value: Value) -> StoreResult<()> {
        self.set_many(vec![(key, value)])
    }
}
