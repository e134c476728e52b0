//! Keychain provider for session secrets
//!
//! ## Usage
//!
//! ```no_run
//! use jobportal_common::security::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("Jobportal.session");
//! keychain.set_secret("refreshToken", "opaque-value")?;
//! let secret = keychain.get_secret("refreshToken")?;
//! assert_eq!(secret, "opaque-value");
//! # Ok::<(), jobportal_common::security::KeychainError>(())
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use keyring::Entry;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Platform keychain scoped to one service name
///
/// Entries are opened once per key and reused by every clone of the
/// provider.
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
    entries: Arc<Mutex<HashMap<String, Arc<Entry>>>>,
}

impl KeychainProvider {
    /// Create a provider for `service_name` (e.g. "Jobportal.session").
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Service name entries are stored under.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Store a secret value
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "storing secret in keychain");

        self.entry(key)?.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("failed to store secret for {key}: {e}"))
        })
    }

    /// Retrieve a secret value
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if the secret doesn't exist
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %key, "retrieving secret from keychain");

        self.entry(key)?.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => KeychainError::NotFound,
            other => {
                KeychainError::AccessFailed(format!("failed to retrieve secret for {key}: {other}"))
            }
        })
    }

    /// Delete a secret (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "deleting secret from keychain");

        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                Err(KeychainError::AccessFailed(format!("failed to delete secret for {key}: {e}")))
            }
        }
    }

    /// Check if a secret exists.
    #[must_use]
    pub fn secret_exists(&self, key: &str) -> bool {
        self.entry(key).is_ok_and(|entry| entry.get_password().is_ok())
    }

    fn entry(&self, account: &str) -> Result<Arc<Entry>, KeychainError> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(account) {
            return Ok(Arc::clone(entry));
        }

        let entry = Entry::new(&self.service_name, account).map_err(|e| {
            KeychainError::AccessFailed(format!("failed to create keychain entry: {e}"))
        })?;
        let entry = Arc::new(entry);
        entries.insert(account.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("entry not found")]
    NotFound,
}

/// Route keychain access to keyring's in-memory mock store
///
/// Tests call this so they never touch the developer's real keychain.
#[cfg(test)]
pub(crate) fn use_mock_store() {
    keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
}
