//! Logging setup

use crate::cli::LogFormat;
use anyhow::{Context, Result};
use config::{EnvSource, EnvStore, LOG_LEVEL};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use types::LogLevel;

/// Level to start logging at, read ahead of full resolution so that
/// resolution itself is logged
pub fn startup_level<E: EnvSource + ?Sized>(env: &E) -> LogLevel {
    env.get(LOG_LEVEL)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        LogFormat::Json => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    info!("Logging initialized at {}", level);
    if level.is_verbose() {
        warn!("Debug/trace logging enabled - may impact performance in production");
    }

    Ok(())
}

/// Report what the settings file contributed. Called once logging is up,
/// since the store is read before the subscriber exists.
pub fn log_settings_file(env_file: Option<&Path>, store: &EnvStore) {
    match env_file {
        Some(path) if store.file_entries().is_empty() => {
            info!("No settings read from {}", path.display());
        }
        Some(path) => {
            info!(
                "Loaded {} settings from {}",
                store.file_entries().len(),
                path.display()
            );
        }
        None => info!("Settings file disabled, using process environment only"),
    }
}
