//! Key/value persistence seam.
//!
//! The tracker only needs string get/set/remove. Backends implement
//! [`KeyValueStore`]; `bt-db` provides the `SQLite` one used by the CLI and
//! [`MemoryStore`] covers tests.

use std::collections::HashMap;

use thiserror::Error;

/// Key holding the serialized activity log.
pub const ACTIVITIES_KEY: &str = "activities";
/// Key holding the baby's display name.
pub const BABY_NAME_KEY: &str = "baby_name";
/// Key holding the feeding type preference.
pub const FEEDING_TYPE_KEY: &str = "feeding_type";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored value could not be decoded.
    #[error("corrupt value under key {key}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for key {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wraps any backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// A string-keyed persistent store.
///
/// This allows the tracker to work with different backends
/// (e.g., the `SQLite` database from bt-db, or an in-memory map in tests).
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// An in-memory store.
///
/// Writes can be switched off to exercise failure handling.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    reject_writes: bool,
}

/// Error returned by a [`MemoryStore`] with writes switched off.
#[derive(Debug, Error)]
#[error("writes are disabled")]
pub struct WritesDisabled;

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail (or succeed again).
    pub const fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::backend(WritesDisabled));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.values.remove(key);
        Ok(())
    }
}
