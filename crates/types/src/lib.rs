//! Shared types for the notification service
//!
//! This crate contains the error types and the typed setting values shared
//! between the configuration crate and the service binary.

pub mod error;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use error::ConfigError;
pub use settings::{Environment, LogLevel};
