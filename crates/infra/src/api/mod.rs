//! Backend API clients
//!
//! # Architecture
//!
//! - [`ApiClientFactory`] builds an [`ApiClient`] per backend host; all of
//!   them share one [`HttpClient`](crate::http::HttpClient) and one
//!   [`AccessTokenProvider`]
//! - Bearer tokens are resolved at send time, 401 triggers one shared refresh
//!   and a single replay
//! - [`AuthApiClient`] is the typed auth-host client and doubles as the
//!   refresh backend of the coordinator
//! - [`ApiError`] is the closed error type every response is classified into

pub mod auth;
pub mod client;
pub mod errors;
pub mod linkedin;

pub use auth::{AccessTokenProvider, AuthApiClient};
pub use client::{ApiClient, ApiClientFactory, ApiHost};
pub use errors::{ApiError, ProblemDetails};
pub use linkedin::LinkedInAuthorizer;
