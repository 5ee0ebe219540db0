//! Notification service - configuration entry point

use anyhow::{Context, Result};
use clap::Parser;
use config::ConfigLoader;
use std::process::ExitCode;
use tracing::info;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Command};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let policy = cli.policy();

    // Settings file is optional; variables already exported win over it
    let env_file = cli.env_file();
    let store = ConfigLoader::store(env_file.as_deref()).context("Failed to load settings file")?;

    logging::init_logging(logging::startup_level(&store), cli.log_format)?;
    logging::log_settings_file(env_file.as_deref(), &store);

    match cli.command {
        None => {
            info!("Starting notification service v{}", env!("CARGO_PKG_VERSION"));
            commands::start(&store, policy)?;
        }
        Some(Command::Check { json }) => {
            if !commands::check(&store, policy, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Command::Show {
            format,
            reveal_secrets,
        }) => commands::show(&store, policy, format, reveal_secrets)?,
        Some(Command::Example { output, force }) => commands::example(&output, force)?,
    }

    Ok(ExitCode::SUCCESS)
}
