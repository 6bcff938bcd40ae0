//! Key/value storage behind the Local backend
//!
//! The Local backend keeps each collection as one serialized string under a
//! well-known key, mirroring a browser's `localStorage`. Two implementations
//! are provided: one JSON file per key on disk, and an in-memory map.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;

use super::file_io::{read_text, remove_if_exists, write_atomic};

/// Key holding the Local `groups` collection
pub const GROUPS_KEY: &str = "groups";
/// Key holding the Local `expenses` collection (shared by all groups)
pub const EXPENSES_KEY: &str = "expenses";
/// Key holding the remembered guest profile
pub const GUEST_KEY: &str = "guestUser";

/// Synchronous string key/value store
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, LedgerError>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), LedgerError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove_item(&self, key: &str) -> Result<(), LedgerError>;
}

/// Stores each key as `<dir>/<key>.json`
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a file-backed store rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the directory holding the collection files
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, LedgerError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LedgerError::Storage(format!("Invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, LedgerError> {
        read_text(self.path_for(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        write_atomic(self.path_for(key)?, value.as_bytes())
    }

    fn remove_item(&self, key: &str) -> Result<(), LedgerError> {
        remove_if_exists(self.path_for(key)?)
    }
}

/// Process-local store, lost when dropped
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.remove(key);
        Ok(())
    }
}
