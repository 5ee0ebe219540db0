//! Configuration loader implementation

use crate::env::{EnvSource, EnvStore};
use crate::resolver::{ConfigResolver, MalformedPolicy, Resolution, SETTINGS};
use crate::schema::Config;
use crate::validation::ConfigValidator;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};
use types::ConfigError;

/// Default name of the optional settings file
pub const DEFAULT_ENV_FILE: &str = ".env";

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Install the process-wide configuration. Only the first call succeeds.
pub fn init_global(config: Config) -> Result<&'static Config, ConfigError> {
    let mut installed = false;
    let stored = GLOBAL.get_or_init(|| {
        installed = true;
        config
    });

    if installed {
        Ok(stored)
    } else {
        Err(ConfigError::AlreadyInitialized)
    }
}

/// Process-wide configuration, once installed
pub fn global() -> Option<&'static Config> {
    GLOBAL.get()
}

/// Configuration loader that combines the settings file and the process
/// environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using an optional settings file and the given policy
    pub fn load_with(env_file: Option<&Path>, policy: MalformedPolicy) -> Result<Config, ConfigError> {
        let store = Self::store(env_file)?;
        Self::load_from_source(&store, policy)
    }

    /// Load from any environment store
    pub fn load_from_source<E: EnvSource + ?Sized>(
        env: &E,
        policy: MalformedPolicy,
    ) -> Result<Config, ConfigError> {
        let resolution = Self::resolve_from_source(env, policy)?;
        Ok(resolution.config)
    }

    /// Load, then reject the configuration if validation reports errors
    pub fn load_validated<E: EnvSource + ?Sized>(
        env: &E,
        policy: MalformedPolicy,
    ) -> Result<Config, ConfigError> {
        let config = Self::load_from_source(env, policy)?;

        let report = ConfigValidator::validate(&config);
        for warning in &report.warnings {
            warn!("{}: {}", warning.field, warning.message);
        }
        if let Some(error) = report.errors.first() {
            return Err(ConfigError::ValidationError {
                field: error.field.clone(),
                message: error.message.clone(),
            });
        }

        Ok(config)
    }

    /// Resolve with provenance of each value
    pub fn resolve_from_source<E: EnvSource + ?Sized>(
        env: &E,
        policy: MalformedPolicy,
    ) -> Result<Resolution, ConfigError> {
        let resolution = ConfigResolver::with_policy(policy).resolve_detailed(env)?;

        let overridden: Vec<&str> = resolution.overridden().map(|s| s.key).collect();
        if overridden.is_empty() {
            debug!("All settings use their defaults");
        } else {
            debug!("Settings from environment: {}", overridden.join(", "));
        }

        Ok(resolution)
    }

    /// Build the environment store, reading the settings file if given.
    /// Does not log, so it can run before a subscriber is installed.
    pub fn store(env_file: Option<&Path>) -> Result<EnvStore, ConfigError> {
        match env_file {
            Some(path) => EnvStore::with_dotenv(path),
            None => Ok(EnvStore::process()),
        }
    }

    /// Get default configuration
    pub fn default() -> Config {
        Config::default()
    }

    /// Render the settings file listing every setting with its default
    pub fn example_contents() -> String {
        let mut contents = String::from("# Notification service settings\n");
        for setting in SETTINGS.iter() {
            let _ = writeln!(contents, "{}={}", setting.key, setting.default);
        }
        contents
    }

    /// Create example settings file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        std::fs::write(path.as_ref(), Self::example_contents())
            .context("Failed to write example settings file")?;

        Ok(())
    }
}
