//! In-process store gateway.
//!
//! Used by hosts that persist through their own storage bridge and by tests.
//! Write failures can be injected to exercise `PersistenceFailure` paths.

use super::{StoreError, StoreGateway, StoreKey, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<StoreKey, Value>,
    fail_writes: bool,
    write_batches: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write/remove fail with `StoreError::Rejected`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set_many`/`remove` calls so far.
    pub fn write_batches(&self) -> usize {
        self.write_batches
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Rejected("write quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl StoreGateway for MemoryStore {
    fn get(&self, key: StoreKey) -> StoreResult<Option<Value>> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set_many(&mut self, entries: Vec<(StoreKey, Value)>) -> StoreResult<()> {
        self.check_writable()?;
        self.entries.extend(entries);
        self.write_batches += 1;
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> StoreResult<()> {
        self.check_writable()?;
        self.entries.remove(&key);
        self.write_batches += 1;
        Ok(())
    }
}
