//! In-memory session storage and the storage error type

use std::collections::HashMap;

use jobportal_domain::JobportalError;
use parking_lot::RwLock;
use thiserror::Error;

use super::traits::SessionStorage;

/// Errors raised by a [`SessionStorage`] backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backend could not be reached or refused the operation
    #[error("storage access failed: {0}")]
    Access(String),
}

impl From<StorageError> for JobportalError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Process-local storage backend
///
/// Used by tests and for sessions that must not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set("accessToken", "abc").unwrap();
        assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("abc"));
        assert_eq!(storage.len(), 1);

        storage.remove("accessToken").unwrap();
        assert_eq!(storage.get("accessToken").unwrap(), None);
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("nope").is_ok());
    }

    #[test]
    fn storage_error_maps_to_domain_storage_error() {
        let err: JobportalError = StorageError::Access("locked".into()).into();
        assert!(matches!(err, JobportalError::Storage(msg) if msg.contains("locked")));
    }
}
