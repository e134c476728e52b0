//! Session and credential plumbing shared across Jobportal crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: serialization, error and randomness dependencies
//! - `runtime`: token store, refresh coordinator, in-memory storage
//! - `platform`: platform keychain storage
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{
    is_expired, MemoryStorage, RefreshBackend, RefreshCoordinator, SessionStorage, StorageError,
    TokenStore,
};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider};
