//! Configuration management for the notification service
//!
//! This crate resolves the service settings from an environment-variable
//! store, optionally seeded from a dotenv file, and validates the result.

pub mod env;
pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use env::{EnvSource, EnvStore, MapEnv, ProcessEnv};
pub use loader::{global, init_global, ConfigLoader};
pub use resolver::*;
pub use schema::*;
pub use validation::*;
