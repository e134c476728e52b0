//! # Jobportal App
//!
//! Application layer - session lifecycle and client wiring.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Login, registration, LinkedIn and logout flows
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `common`, and `infra`
//! - Builds one refresh coordinator and hands it to every API client

pub mod context;
pub mod utils;

// Re-export for convenience
pub use context::{AppContext, SessionError};
pub use utils::logging::{init_logging, LogFormat};
