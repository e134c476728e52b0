//! Integration tests for the auth module
//!
//! Exercises the token store, the refresh coordinator and the OAuth state
//! helpers together through the public API.

#![cfg(feature = "test-utils")]

use std::sync::Arc;

use chrono::{Duration, Utc};
use jobportal_common::auth::{
    generate_state, validate_state, MemoryStorage, OAuthStateError, PendingState,
    RefreshCoordinator, SessionStorage, TokenStore,
};
use jobportal_common::testing::{fixtures, FailingStorage, MockRefreshBackend};
use jobportal_domain::constants::{KEY_ACCESS_TOKEN_EXPIRATION, KEY_REFRESH_TOKEN, SESSION_KEYS};

fn coordinator_with(
    backend: &MockRefreshBackend,
) -> (RefreshCoordinator, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = TokenStore::new(storage.clone());
    (RefreshCoordinator::new(store, Arc::new(backend.clone())), storage)
}

/// Validates the full refresh round-trip through persisted storage.
///
/// # Test Steps
/// 1. Persist an expired session
/// 2. Request a token: one refresh happens and the result is persisted
/// 3. Request again: the stored token is reused without another refresh
#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_round_trip_persists_rotated_tokens() {
    let backend = MockRefreshBackend::succeeding(fixtures::token_response("fresh"));
    let (coordinator, storage) = coordinator_with(&backend);
    coordinator.store().write(Some(&fixtures::expired_session())).unwrap();

    let first = coordinator.get_or_refresh_token(None).await;
    let second = coordinator.get_or_refresh_token(None).await;

    assert_eq!(first.as_deref(), Some("fresh"));
    assert_eq!(second.as_deref(), Some("fresh"));
    assert_eq!(backend.call_count(), 1);
    assert_eq!(storage.get(KEY_REFRESH_TOKEN).unwrap().as_deref(), Some("fresh-refresh"));

    // Identity survives a refresh that does not repeat it.
    let session = coordinator.store().read();
    assert_eq!(session.email.as_deref(), Some("karen@example.dk"));
    assert_eq!(session.is_linkedin_user, Some(false));
}

/// Validates that a rejected refresh wipes every session key.
///
/// # Test Steps
/// 1. Persist an expired session
/// 2. Fail the refresh
/// 3. Verify no session key is left in storage
#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_clears_all_session_keys() {
    let backend = MockRefreshBackend::failing();
    let (coordinator, storage) = coordinator_with(&backend);
    coordinator.store().write(Some(&fixtures::expired_session())).unwrap();
    assert_eq!(storage.len(), SESSION_KEYS.len());

    assert_eq!(coordinator.get_or_refresh_token(None).await, None);
    assert!(storage.is_empty());
}

/// Validates that an unparsable stored expiry is treated as expired.
#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_expiry_triggers_refresh() {
    let backend = MockRefreshBackend::succeeding(fixtures::token_response("fresh"));
    let (coordinator, storage) = coordinator_with(&backend);
    coordinator.store().write(Some(&fixtures::valid_session())).unwrap();
    storage.set(KEY_ACCESS_TOKEN_EXPIRATION, "not-a-date").unwrap();

    assert_eq!(coordinator.get_or_refresh_token(None).await.as_deref(), Some("fresh"));
    assert_eq!(backend.call_count(), 1);
}

/// Validates that a session without a refresh token is cleared without
/// contacting the backend.
#[tokio::test(flavor = "multi_thread")]
async fn test_missing_refresh_token_skips_backend() {
    let backend = MockRefreshBackend::succeeding(fixtures::token_response("fresh"));
    let (coordinator, storage) = coordinator_with(&backend);
    let session = jobportal_domain::Session {
        refresh_token: None,
        ..fixtures::expired_session()
    };
    coordinator.store().write(Some(&session)).unwrap();

    assert_eq!(coordinator.get_or_refresh_token(None).await, None);
    assert_eq!(backend.call_count(), 0);
    assert!(storage.is_empty());
}

/// Validates that a broken storage backend reads as "no session".
#[tokio::test(flavor = "multi_thread")]
async fn test_unavailable_storage_reads_as_logged_out() {
    let backend = MockRefreshBackend::succeeding(fixtures::token_response("fresh"));
    let store = TokenStore::new(Arc::new(FailingStorage));
    let coordinator = RefreshCoordinator::new(store, Arc::new(backend.clone()));

    assert!(coordinator.store().read().is_empty());
    assert_eq!(coordinator.get_or_refresh_token(Some("bootstrap")).await.as_deref(), Some("bootstrap"));
    assert_eq!(backend.call_count(), 0);
    assert!(coordinator.store().write(Some(&fixtures::valid_session())).is_err());
}

/// Validates that an expiry exactly at "now" already counts as expired.
#[test]
fn test_expiry_boundary() {
    let now = Utc::now();
    let session = jobportal_domain::Session {
        access_token_expiration: Some(now),
        ..fixtures::valid_session()
    };
    assert_eq!(session.valid_access_token(now), None);

    let later = jobportal_domain::Session {
        access_token_expiration: Some(now + Duration::seconds(1)),
        ..fixtures::valid_session()
    };
    assert_eq!(later.valid_access_token(now), Some("access-valid"));
}

/// Validates OAuth state generation and single-use validation.
///
/// # Test Steps
/// 1. Generate two states and verify uniqueness and length
/// 2. Issue a pending state and consume it with the right value
/// 3. Verify a second consume fails as missing
#[test]
fn test_state_generation_and_validation() {
    let state1 = generate_state();
    let state2 = generate_state();
    assert_ne!(state1, state2);
    assert!(state1.len() >= 32);
    assert!(validate_state(&state1, &state1));
    assert!(!validate_state(&state1, &state2));

    let pending = PendingState::new();
    let issued = pending.issue();
    assert_eq!(pending.consume(&issued), Ok(()));
    assert_eq!(pending.consume(&issued), Err(OAuthStateError::Missing));
}
