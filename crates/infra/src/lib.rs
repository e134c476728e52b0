//! # Jobportal Infrastructure
//!
//! Everything that talks to the network or the environment.
//!
//! This crate contains:
//! - The shared HTTP transport with timeout and retry
//! - Authenticated API clients for the core and auth hosts
//! - The auth API client that backs the refresh coordinator
//! - LinkedIn authorization helpers
//! - Configuration loading from files and `JOBPORTAL_*` variables
//!
//! ## Architecture
//! - Implements `RefreshBackend` from `jobportal-common`
//! - Depends on `jobportal-domain` and `jobportal-common`

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientFactory, ApiError, ApiHost, AuthApiClient,
    LinkedInAuthorizer,
};
pub use errors::InfraError;
pub use http::HttpClient;
