//! Session persistence and token refresh
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ RefreshCoordinator │  single-flight refresh, fail-closed on error
//! └─────────┬──────────┘
//!           │
//!           ├──► RefreshBackend   (auth API, injected)
//!           │
//!           └──► TokenStore       (typed view over the session keys)
//!                     │
//!                     └──► SessionStorage  (memory / platform keychain)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use jobportal_common::auth::{MemoryStorage, RefreshBackend, RefreshCoordinator, TokenStore};
//!
//! async fn example(backend: Arc<dyn RefreshBackend>) {
//!     let store = TokenStore::new(Arc::new(MemoryStorage::new()));
//!     let coordinator = RefreshCoordinator::new(store, backend);
//!
//!     // Returns the stored token, or refreshes once no matter how many
//!     // tasks ask at the same time.
//!     let token = coordinator.get_or_refresh_token(None).await;
//!     # let _ = token;
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`traits`]**: `SessionStorage` and `RefreshBackend` seams
//! - **[`storage`]**: in-memory storage backend and `StorageError`
//! - **[`token_store`]**: session read/write and expiry checks
//! - **[`coordinator`]**: the single-flight refresh coordinator
//! - **[`oauth_state`]**: CSRF state generation and validation

pub mod coordinator;
#[cfg(feature = "platform")]
mod keychain;
pub mod oauth_state;
pub mod storage;
pub mod token_store;
pub mod traits;

// Re-export commonly used types and functions
pub use coordinator::RefreshCoordinator;
pub use oauth_state::{generate_state, validate_state, OAuthStateError, PendingState};
pub use storage::{MemoryStorage, StorageError};
pub use token_store::{is_expired, TokenStore};
pub use traits::{RefreshBackend, SessionStorage};
