//! Traits for session storage and token refresh
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (persistent storage, the auth API).

use async_trait::async_trait;
use jobportal_domain::{JobportalError, RefreshRequest, TokenResponse};

use super::storage::StorageError;

/// Key-value storage holding the persisted session
///
/// Mirrors the semantics of browser local storage: flat string keys,
/// string values, removal of a missing key is not an error.
pub trait SessionStorage: Send + Sync {
    /// Read a value, `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns error if the backend cannot be reached
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value (idempotent).
    ///
    /// # Errors
    /// Returns error if the backend rejects the removal
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Trait for the network side of a token refresh
///
/// Implemented by the auth API client; tests use
/// [`MockRefreshBackend`](crate::testing::MockRefreshBackend).
#[async_trait]
pub trait RefreshBackend: Send + Sync {
    /// Exchange a refresh token for a new token set
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects the token
    async fn refresh(&self, request: RefreshRequest) -> Result<TokenResponse, JobportalError>;
}
