//! Utility helpers shared by the application layer

pub mod logging;
