//! Mock implementations of the auth traits

// Test mocks: errors are visible in the return types, poisoned locks fail the test
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jobportal_domain::{JobportalError, RefreshRequest, TokenResponse};

use crate::auth::{RefreshBackend, SessionStorage, StorageError};

/// Mock refresh backend that records calls instead of hitting the network
///
/// Clones share state, so a test can keep one handle and give another to
/// the coordinator.
#[derive(Clone, Debug)]
pub struct MockRefreshBackend {
    response: Arc<Mutex<Option<TokenResponse>>>,
    requests: Arc<Mutex<Vec<RefreshRequest>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockRefreshBackend {
    /// Backend that answers every refresh with `response`.
    #[must_use]
    pub fn succeeding(response: TokenResponse) -> Self {
        Self::with_response(Some(response))
    }

    /// Backend that rejects every refresh.
    #[must_use]
    pub fn failing() -> Self {
        Self::with_response(None)
    }

    fn with_response(response: Option<TokenResponse>) -> Self {
        Self {
            response: Arc::new(Mutex::new(response)),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Hold every refresh for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the configured response (`None` makes refreshes fail).
    pub fn set_response(&self, response: Option<TokenResponse>) {
        *self.response.lock().unwrap() = response;
    }

    /// Number of refresh calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RefreshRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<RefreshRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RefreshBackend for MockRefreshBackend {
    async fn refresh(&self, request: RefreshRequest) -> Result<TokenResponse, JobportalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| JobportalError::Auth("refresh token rejected".to_string()))
    }
}

/// Storage backend whose every operation fails
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStorage;

impl SessionStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Access("storage unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Access("storage unavailable".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Access("storage unavailable".to_string()))
    }
}
