//! # Jobportal Domain
//!
//! Domain types shared by every Jobportal crate.
//!
//! This crate contains:
//! - Session and authentication payload types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Persisted storage keys, default hosts and endpoint paths
//!
//! ## Architecture
//! - No dependencies on other Jobportal crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
