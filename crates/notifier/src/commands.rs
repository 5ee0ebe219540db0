//! Subcommand implementations

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use config::{
    init_global, Config, ConfigLoader, ConfigValidator, EnvSource, MalformedPolicy, Resolution,
    Source, ValidationReport,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{error, info, warn};

/// Setting as printed by `show`
#[derive(Debug, Serialize)]
struct ShownSetting<'a> {
    key: &'a str,
    value: String,
    source: Source,
}

/// Resolve, validate and install the configuration for the rest of the process
pub fn start<E: EnvSource + ?Sized>(env: &E, policy: MalformedPolicy) -> Result<&'static Config> {
    let resolution = ConfigLoader::resolve_from_source(env, policy)
        .context("Failed to resolve configuration")?;
    for fallback in resolution.fallbacks() {
        warn!("{} fell back to its default {}", fallback.key, fallback.value);
    }

    let report = ConfigValidator::validate(&resolution.config);
    log_report(&report);
    if report.has_errors() {
        bail!("Configuration is invalid ({})", report.summary());
    }

    let config = init_global(resolution.config).context("Failed to install configuration")?;

    info!("Environment: {}", config.environment());
    info!("Port: {}", config.port);
    info!("Kafka client {} -> {}", config.kafka_client_id, config.kafka_brokers().join(", "));
    info!("Notification limit: {} per hour", config.max_notifications_per_hour);
    info!("Elasticsearch: {}", config.elasticsearch_url);
    info!("Configuration ready");

    Ok(config)
}

/// Resolve and validate, printing the report. Returns whether the
/// configuration is usable.
pub fn check<E: EnvSource + ?Sized>(env: &E, policy: MalformedPolicy, json: bool) -> Result<bool> {
    let resolution = match ConfigLoader::resolve_from_source(env, policy) {
        Ok(resolution) => resolution,
        Err(e) => {
            error!("{}", e);
            println!("{}", e);
            return Ok(false);
        }
    };

    let report = ConfigValidator::validate(&resolution.config);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", render_report(&report));
    }

    Ok(report.is_valid())
}

/// Print every resolved setting
pub fn show<E: EnvSource + ?Sized>(
    env: &E,
    policy: MalformedPolicy,
    format: OutputFormat,
    reveal_secrets: bool,
) -> Result<()> {
    let resolution = ConfigLoader::resolve_from_source(env, policy)
        .context("Failed to resolve configuration")?;
    print!("{}", render_settings(&resolution, format, reveal_secrets)?);
    Ok(())
}

/// Write the example settings file
pub fn example(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", output.display());
    }
    ConfigLoader::create_example(output)?;
    info!("Wrote example settings to {}", output.display());
    Ok(())
}

fn log_report(report: &ValidationReport) {
    for issue in &report.warnings {
        warn!("{}: {}", issue.field, issue.message);
    }
    for issue in &report.errors {
        error!("{}: {}", issue.field, issue.message);
    }
}

fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for issue in &report.errors {
        let _ = writeln!(out, "error   {}: {}", issue.field, issue.message);
    }
    for issue in &report.warnings {
        let _ = writeln!(out, "warning {}: {}", issue.field, issue.message);
    }
    let _ = writeln!(out, "{}", report.summary());
    out
}

fn render_settings(resolution: &Resolution, format: OutputFormat, reveal_secrets: bool) -> Result<String> {
    let shown: Vec<ShownSetting<'_>> = resolution
        .settings
        .iter()
        .map(|setting| ShownSetting {
            key: setting.key,
            value: if reveal_secrets {
                setting.value.clone()
            } else {
                setting.display_value()
            },
            source: setting.source,
        })
        .collect();

    match format {
        OutputFormat::Yaml => serde_yaml::to_string(&shown).context("Failed to serialize settings"),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&shown).context("Failed to serialize settings")?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{MapEnv, JWT_SECRET, LOG_LEVEL, MAX_NOTIFICATIONS_PER_HOUR, NODE_ENV};
    use tempfile::tempdir;

    fn resolution(env: &MapEnv) -> Resolution {
        ConfigLoader::resolve_from_source(env, MalformedPolicy::Reject).unwrap()
    }

    #[test]
    fn test_render_settings_masks_secret() {
        let env = MapEnv::new().with(JWT_SECRET, "hunter2-hunter2");
        let yaml = render_settings(&resolution(&env), OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("JWT_SECRET"));
        assert!(yaml.contains("<redacted>"));
        assert!(!yaml.contains("hunter2-hunter2"));

        let json = render_settings(&resolution(&env), OutputFormat::Json, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let secret = parsed
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["key"] == JWT_SECRET)
            .unwrap();
        assert_eq!(secret["value"], "hunter2-hunter2");
        assert_eq!(secret["source"], "environment");
    }

    #[test]
    fn test_render_settings_lists_sources() {
        let env = MapEnv::new().with(LOG_LEVEL, "warn");
        let json = render_settings(&resolution(&env), OutputFormat::Json, false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let settings = parsed.as_array().unwrap();
        assert_eq!(settings.len(), config::SETTINGS.len());
        assert_eq!(settings[0]["key"], "PORT");
        assert_eq!(settings[0]["source"], "default");
    }

    #[test]
    fn test_render_report() {
        let config = Config {
            node_env: "production".to_string(),
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        let text = render_report(&report);
        assert!(text.starts_with("error   JWT_SECRET:"));
        assert!(text.ends_with("Validation: 1 errors, 0 warnings\n"));
    }

    #[test]
    fn test_check_outcome() {
        assert!(check(&MapEnv::new(), MalformedPolicy::Reject, false).unwrap());

        let env = MapEnv::new().with(NODE_ENV, "production");
        assert!(!check(&env, MalformedPolicy::Reject, true).unwrap());

        let env = MapEnv::new().with(MAX_NOTIFICATIONS_PER_HOUR, "abc");
        assert!(!check(&env, MalformedPolicy::Reject, false).unwrap());
        assert!(check(&env, MalformedPolicy::UseDefault, false).unwrap());
    }

    #[test]
    fn test_example_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env.example");

        example(&path, false).unwrap();
        assert!(example(&path, false).is_err());
        example(&path, true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ELASTICSEARCH_URL=http://localhost:9200"));
    }

    #[test]
    fn test_start_rejects_invalid_configuration() {
        let env = MapEnv::new().with(LOG_LEVEL, "loud");
        let err = start(&env, MalformedPolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("Configuration is invalid"));
    }
}
