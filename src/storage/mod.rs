pub mod json_backend;

use std::{collections::HashMap, sync::Mutex};

use crate::errors::LedgerError;

pub use json_backend::JsonStore;

/// Slot key for the ledger state document.
pub const STATE_KEY: &str = "finance_state_v1";
/// Slot key for the snapshot list document.
pub const SNAPSHOT_KEY: &str = "finance_snapshots_v1";

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over string-keyed persistence backends. The engine only ever
/// reads and writes whole JSON documents per slot.
pub trait StateStore: Send + Sync {
    /// Returns the raw document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deletes the slot. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store for unit tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().expect("slot map lock poisoned");
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().expect("slot map lock poisoned");
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.lock().expect("slot map lock poisoned");
        slots.remove(key);
        Ok(())
    }
}
