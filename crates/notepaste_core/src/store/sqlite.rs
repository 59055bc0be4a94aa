//! SQLite-backed store gateway.
//!
//! # Responsibility
//! - Persist the extension key/value schema in a local `kv` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - `set_many` runs in one immediate transaction.
//! - Reads reject undecodable JSON instead of masking it.

use super::{StoreGateway, StoreKey, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;
use std::path::Path;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and migrates) a store file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl StoreGateway for SqliteStore {
    fn get(&self, key: StoreKey) -> StoreResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1;",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(text.as_str())?)),
            None => Ok(None),
        }
    }

    fn set_many(&mut self, entries: Vec<(StoreKey, Value)>) -> StoreResult<()> {
        let encoded = entries
            .iter()
            .map(|(key, value)| serde_json::to_string(value).map(|text| (*key, text)))
            .collect::<Result<Vec<_>, _>>()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for (key, text) in &encoded {
            tx.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now') * 1000)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key.as_str(), text],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1;", [key.as_str()])?;
        Ok(())
    }
}
