//! Domain types and models

pub mod auth;
pub mod session;

pub use auth::{
    LinkedInCallbackRequest, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest,
    TokenResponse,
};
pub use session::{format_timestamp, parse_timestamp, Session};
