//! Setting resolution from an environment-variable store
//!
//! Every setting is declared once in [`SETTINGS`] with its variable name,
//! literal default and parser. Resolution walks the table in a single pass:
//! a present, non-empty variable wins, anything else takes the default.

use crate::env::EnvSource;
use crate::schema::*;
use serde::Serialize;
use tracing::{debug, warn};
use types::utils::redact_secret;
use types::ConfigError;

/// Parser that stores a raw value into its field
type Apply = fn(&mut Config, &str) -> Result<(), ConfigError>;

/// Declaration of one configuration setting
#[derive(Clone, Copy)]
pub struct Setting {
    /// Environment variable name
    pub key: &'static str,
    /// Literal used when the variable is unset or empty
    pub default: &'static str,
    /// Whether the value must be hidden in output
    pub secret: bool,
    apply: Apply,
}

impl Setting {
    const fn text(key: &'static str, default: &'static str, apply: Apply) -> Self {
        Self {
            key,
            default,
            secret: false,
            apply,
        }
    }

    const fn secret(key: &'static str, default: &'static str, apply: Apply) -> Self {
        Self {
            key,
            default,
            secret: true,
            apply,
        }
    }
}

impl std::fmt::Debug for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Setting")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("secret", &self.secret)
            .finish()
    }
}

pub const PORT: &str = "PORT";
pub const NODE_ENV: &str = "NODE_ENV";
pub const MONGO_URI: &str = "MONGO_URI";
pub const KAFKA_CLIENT_ID: &str = "KAFKA_CLIENT_ID";
pub const KAFKA_BOOTSTRAP_SERVERS: &str = "KAFKA_BOOTSTRAP_SERVERS";
pub const JWT_SECRET: &str = "JWT_SECRET";
pub const JWT_EXPIRATION: &str = "JWT_EXPIRATION";
pub const MAX_NOTIFICATIONS_PER_HOUR: &str = "MAX_NOTIFICATIONS_PER_HOUR";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";

/// All settings, in resolution order
pub static SETTINGS: [Setting; 10] = [
    Setting::text(PORT, DEFAULT_PORT, |c, v| {
        c.port = v.to_string();
        Ok(())
    }),
    Setting::text(NODE_ENV, DEFAULT_NODE_ENV, |c, v| {
        c.node_env = v.to_string();
        Ok(())
    }),
    Setting::text(
        MONGO_URI,
        DEFAULT_MONGO_URI,
        |c, v| {
            c.mongo_uri = v.to_string();
            Ok(())
        },
    ),
    Setting::text(KAFKA_CLIENT_ID, DEFAULT_KAFKA_CLIENT_ID, |c, v| {
        c.kafka_client_id = v.to_string();
        Ok(())
    }),
    Setting::text(KAFKA_BOOTSTRAP_SERVERS, DEFAULT_KAFKA_BOOTSTRAP_SERVERS, |c, v| {
        c.kafka_bootstrap_servers = v.to_string();
        Ok(())
    }),
    Setting::secret(JWT_SECRET, DEFAULT_JWT_SECRET, |c, v| {
        c.jwt_secret = v.to_string();
        Ok(())
    }),
    Setting::text(JWT_EXPIRATION, DEFAULT_JWT_EXPIRATION, |c, v| {
        c.jwt_expiration = v.to_string();
        Ok(())
    }),
    Setting::text(MAX_NOTIFICATIONS_PER_HOUR, DEFAULT_MAX_NOTIFICATIONS_PER_HOUR_STR, |c, v| {
        c.max_notifications_per_hour = parse_integer(MAX_NOTIFICATIONS_PER_HOUR, v)?;
        Ok(())
    }),
    Setting::text(LOG_LEVEL, DEFAULT_LOG_LEVEL, |c, v| {
        c.log_level = v.to_string();
        Ok(())
    }),
    Setting::text(ELASTICSEARCH_URL, DEFAULT_ELASTICSEARCH_URL, |c, v| {
        c.elasticsearch_url = v.to_string();
        Ok(())
    }),
];

/// Look up a setting declaration by variable name
pub fn setting(key: &str) -> Option<&'static Setting> {
    SETTINGS.iter().find(|s| s.key == key)
}

/// Parse a base-10 unsigned integer, ignoring surrounding whitespace
pub fn parse_integer(key: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidInteger {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

/// What to do when a variable holds a value its parser rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail resolution with the parse error
    #[default]
    Reject,
    /// Log a warning and use the setting's default
    UseDefault,
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Supplied by the environment store
    Environment,
    /// Variable unset or empty
    Default,
    /// Variable set but malformed, default used instead
    Fallback,
}

/// One resolved setting and its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSetting {
    pub key: &'static str,
    pub value: String,
    pub source: Source,
    #[serde(skip)]
    pub secret: bool,
}

impl ResolvedSetting {
    /// Value safe for display
    pub fn display_value(&self) -> String {
        if self.secret {
            redact_secret(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Result of a detailed resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: Config,
    pub settings: Vec<ResolvedSetting>,
}

impl Resolution {
    /// Settings taken from the environment store
    pub fn overridden(&self) -> impl Iterator<Item = &ResolvedSetting> {
        self.settings
            .iter()
            .filter(|s| s.source == Source::Environment)
    }

    /// Settings whose supplied value was rejected
    pub fn fallbacks(&self) -> impl Iterator<Item = &ResolvedSetting> {
        self.settings.iter().filter(|s| s.source == Source::Fallback)
    }
}

/// Resolves [`Config`] from an environment store
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResolver {
    policy: MalformedPolicy,
}

impl ConfigResolver {
    /// Resolver that rejects malformed values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MalformedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Resolve the configuration
    pub fn resolve<E: EnvSource + ?Sized>(&self, env: &E) -> Result<Config, ConfigError> {
        self.resolve_detailed(env).map(|resolution| resolution.config)
    }

    /// Resolve the configuration and report the source of every value
    pub fn resolve_detailed<E: EnvSource + ?Sized>(
        &self,
        env: &E,
    ) -> Result<Resolution, ConfigError> {
        let mut config = Config::default();
        let mut settings = Vec::with_capacity(SETTINGS.len());

        for setting in SETTINGS.iter() {
            let supplied = env.get(setting.key).filter(|v| !v.is_empty());

            let (value, source) = match supplied {
                Some(raw) => match (setting.apply)(&mut config, &raw) {
                    Ok(()) => (raw, Source::Environment),
                    Err(e) => match self.policy {
                        MalformedPolicy::Reject => return Err(e),
                        MalformedPolicy::UseDefault => {
                            warn!(
                                "{}; using default {:?} for {}",
                                e, setting.default, setting.key
                            );
                            (setting.apply)(&mut config, setting.default)?;
                            (setting.default.to_string(), Source::Fallback)
                        }
                    },
                },
                None => {
                    (setting.apply)(&mut config, setting.default)?;
                    (setting.default.to_string(), Source::Default)
                }
            };

            debug!("Resolved {} from {:?}", setting.key, source);
            settings.push(ResolvedSetting {
                key: setting.key,
                value,
                source,
                secret: setting.secret,
            });
        }

        Ok(Resolution { config, settings })
    }
}

/// Resolve with the default policy
pub fn resolve<E: EnvSource + ?Sized>(env: &E) -> Result<Config, ConfigError> {
    ConfigResolver::new().resolve(env)
}
