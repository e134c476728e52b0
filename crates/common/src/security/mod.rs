//! Platform credential storage
//!
//! Wraps the platform keychain (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) behind a small string-secret API.

pub mod keychain;

pub use keychain::{KeychainError, KeychainProvider};
