//! Testing utilities and helpers
//!
//! - **[`fixtures`]**: ready-made sessions and token responses
//! - **[`mocks`]**: mock refresh backend and storage backends
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jobportal_common::auth::{MemoryStorage, RefreshCoordinator, TokenStore};
//! use jobportal_common::testing::{fixtures, MockRefreshBackend};
//!
//! let backend = Arc::new(MockRefreshBackend::succeeding(fixtures::token_response("fresh")));
//! let store = TokenStore::new(Arc::new(MemoryStorage::new()));
//! store.write(Some(&fixtures::expired_session())).unwrap();
//! let coordinator = RefreshCoordinator::new(store, backend.clone());
//! # let _ = coordinator;
//! ```

pub mod fixtures;
pub mod mocks;

pub use mocks::{FailingStorage, MockRefreshBackend};
