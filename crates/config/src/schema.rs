//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use types::utils::{parse_duration_literal, redact_secret};
use types::{Environment, LogLevel};

/// Resolved notification service configuration.
///
/// Serialized field names match the environment variable names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    /// HTTP server port, kept as the raw value
    #[serde(default = "default_port")]
    pub port: String,
    /// Deployment environment name
    #[serde(default = "default_node_env")]
    pub node_env: String,
    /// MongoDB connection URI
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,
    /// Kafka client identifier
    #[serde(default = "default_kafka_client_id")]
    pub kafka_client_id: String,
    /// Kafka bootstrap servers
    #[serde(default = "default_kafka_bootstrap_servers")]
    pub kafka_bootstrap_servers: String,
    /// Secret used to sign JWTs
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT lifetime literal, e.g. `1h`
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: String,
    /// Per-user notification limit
    #[serde(default = "default_max_notifications_per_hour")]
    pub max_notifications_per_hour: u32,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Elasticsearch endpoint
    #[serde(default = "default_elasticsearch_url")]
    pub elasticsearch_url: String,
}

// Default values, one per setting
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_NODE_ENV: &str = "development";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/notificationSystem";
pub const DEFAULT_KAFKA_CLIENT_ID: &str = "notification-service";
pub const DEFAULT_KAFKA_BOOTSTRAP_SERVERS: &str = "http://test";
pub const DEFAULT_JWT_SECRET: &str = "default_secret_key";
pub const DEFAULT_JWT_EXPIRATION: &str = "1h";
pub const DEFAULT_MAX_NOTIFICATIONS_PER_HOUR: u32 = 5;
pub const DEFAULT_MAX_NOTIFICATIONS_PER_HOUR_STR: &str = "5";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_node_env() -> String {
    DEFAULT_NODE_ENV.to_string()
}

fn default_mongo_uri() -> String {
    DEFAULT_MONGO_URI.to_string()
}

fn default_kafka_client_id() -> String {
    DEFAULT_KAFKA_CLIENT_ID.to_string()
}

fn default_kafka_bootstrap_servers() -> String {
    DEFAULT_KAFKA_BOOTSTRAP_SERVERS.to_string()
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_jwt_expiration() -> String {
    DEFAULT_JWT_EXPIRATION.to_string()
}

fn default_max_notifications_per_hour() -> u32 {
    DEFAULT_MAX_NOTIFICATIONS_PER_HOUR
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_elasticsearch_url() -> String {
    DEFAULT_ELASTICSEARCH_URL.to_string()
}

impl Config {
    /// Port as a number, if the raw value is a valid port
    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse().ok()
    }

    /// Typed deployment environment
    pub fn environment(&self) -> Environment {
        Environment::parse(&self.node_env)
    }

    /// Typed log level, if the raw value names one
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level.parse().ok()
    }

    /// JWT lifetime, if the raw value is a duration literal
    pub fn jwt_expiration_duration(&self) -> Option<Duration> {
        parse_duration_literal(&self.jwt_expiration)
    }

    /// Individual bootstrap server entries
    pub fn kafka_brokers(&self) -> Vec<&str> {
        self.kafka_bootstrap_servers
            .split(',')
            .map(str::trim)
            .collect()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("node_env", &self.node_env)
            .field("mongo_uri", &self.mongo_uri)
            .field("kafka_client_id", &self.kafka_client_id)
            .field("kafka_bootstrap_servers", &self.kafka_bootstrap_servers)
            .field("jwt_secret", &redact_secret(&self.jwt_secret))
            .field("jwt_expiration", &self.jwt_expiration)
            .field("max_notifications_per_hour", &self.max_notifications_per_hour)
            .field("log_level", &self.log_level)
            .field("elasticsearch_url", &self.elasticsearch_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            node_env: default_node_env(),
            mongo_uri: default_mongo_uri(),
            kafka_client_id: default_kafka_client_id(),
            kafka_bootstrap_servers: default_kafka_bootstrap_servers(),
            jwt_secret: default_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            max_notifications_per_hour: default_max_notifications_per_hour(),
            log_level: default_log_level(),
            elasticsearch_url: default_elasticsearch_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_on_defaults() {
        let config = Config::default();
        assert_eq!(config.port_number(), Some(3000));
        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.log_level(), Some(LogLevel::Info));
        assert_eq!(config.jwt_expiration_duration(), Some(Duration::from_secs(3600)));
        assert_eq!(config.kafka_brokers(), vec!["http://test"]);
    }

    #[test]
    fn test_kafka_brokers_split() {
        let config = Config {
            kafka_bootstrap_servers: "broker-1:9092, broker-2:9092".to_string(),
            ..Config::default()
        };
        assert_eq!(config.kafka_brokers(), vec!["broker-1:9092", "broker-2:9092"]);
    }

    #[test]
    fn test_integer_default_literal_matches() {
        assert_eq!(
            DEFAULT_MAX_NOTIFICATIONS_PER_HOUR_STR.parse::<u32>(),
            Ok(DEFAULT_MAX_NOTIFICATIONS_PER_HOUR)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config {
            jwt_secret: "super-secret-value".to_string(),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_serialized_names_match_variables() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["PORT"], "3000");
        assert_eq!(json["MAX_NOTIFICATIONS_PER_HOUR"], 5);
        assert_eq!(json["ELASTICSEARCH_URL"], "http://localhost:9200");
    }
}
