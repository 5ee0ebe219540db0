//! Configuration validation utilities

use crate::resolver::{
    ELASTICSEARCH_URL, JWT_EXPIRATION, JWT_SECRET, KAFKA_BOOTSTRAP_SERVERS, LOG_LEVEL,
    MAX_NOTIFICATIONS_PER_HOUR, MONGO_URI, NODE_ENV, PORT,
};
use crate::schema::{Config, DEFAULT_JWT_SECRET};
use serde::Serialize;
use types::utils::has_scheme;
use types::LogLevel;

/// Shortest JWT secret accepted without a warning
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_server(config, &mut report);
        Self::validate_database(config, &mut report);
        Self::validate_kafka(config, &mut report);
        Self::validate_auth(config, &mut report);
        Self::validate_limits(config, &mut report);
        Self::validate_logging(config, &mut report);
        Self::validate_search(config, &mut report);

        report
    }

    fn validate_server(config: &Config, report: &mut ValidationReport) {
        match config.port_number() {
            None | Some(0) => {
                report.add_error(PORT, &format!("Invalid port '{}', expected 1-65535", config.port));
            }
            Some(port) if port < 1024 => {
                report.add_warning(PORT, "Server port is below 1024, may require elevated privileges");
            }
            Some(_) => {}
        }

        let environment = config.environment();
        if !environment.is_known() {
            report.add_warning(
                NODE_ENV,
                &format!(
                    "Unknown environment '{}'. Known environments: development, production, test",
                    environment
                ),
            );
        }
    }

    fn validate_database(config: &Config, report: &mut ValidationReport) {
        if !has_scheme(&config.mongo_uri, &["mongodb", "mongodb+srv"]) {
            report.add_error(MONGO_URI, "MongoDB URI must start with mongodb:// or mongodb+srv://");
        }
    }

    fn validate_kafka(config: &Config, report: &mut ValidationReport) {
        if config.kafka_brokers().iter().any(|broker| broker.is_empty()) {
            report.add_error(KAFKA_BOOTSTRAP_SERVERS, "Bootstrap server list contains an empty entry");
        }
    }

    fn validate_auth(config: &Config, report: &mut ValidationReport) {
        if config.jwt_secret == DEFAULT_JWT_SECRET {
            if config.environment().is_production() {
                report.add_error(JWT_SECRET, "Default JWT secret cannot be used in production");
            } else {
                report.add_warning(JWT_SECRET, "Using the default JWT secret");
            }
        } else if config.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            report.add_warning(
                JWT_SECRET,
                &format!("JWT secret is short, consider at least {} bytes", MIN_JWT_SECRET_LEN),
            );
        }

        match config.jwt_expiration_duration() {
            None => {
                report.add_error(
                    JWT_EXPIRATION,
                    &format!("Invalid duration '{}', expected e.g. 30s, 15m, 1h, 7d", config.jwt_expiration),
                );
            }
            Some(duration) if duration.is_zero() => {
                report.add_error(JWT_EXPIRATION, "Token lifetime cannot be zero");
            }
            Some(_) => {}
        }
    }

    fn validate_limits(config: &Config, report: &mut ValidationReport) {
        if config.max_notifications_per_hour == 0 {
            report.add_warning(
                MAX_NOTIFICATIONS_PER_HOUR,
                "Notification limit is 0, every notification will be throttled",
            );
        }
    }

    fn validate_logging(config: &Config, report: &mut ValidationReport) {
        match config.log_level() {
            None => {
                report.add_error(
                    LOG_LEVEL,
                    &format!("Invalid log level: {}. Valid levels: {:?}", config.log_level, LogLevel::NAMES),
                );
            }
            Some(level) if level.is_verbose() && config.environment().is_production() => {
                report.add_warning(LOG_LEVEL, "Debug/trace logging may impact performance in production");
            }
            Some(_) => {}
        }
    }

    fn validate_search(config: &Config, report: &mut ValidationReport) {
        if !has_scheme(&config.elasticsearch_url, &["http", "https"]) {
            report.add_error(ELASTICSEARCH_URL, "Elasticsearch URL must start with http:// or https://");
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn test_defaults_are_valid_in_development() {
        let report = ConfigValidator::validate(&Config::default());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(fields(&report.warnings), vec![JWT_SECRET]);
        assert_eq!(report.summary(), "Validation: 0 errors, 1 warnings");
    }

    #[test]
    fn test_invalid_values_reported() {
        let config = Config {
            port: "http".to_string(),
            mongo_uri: "localhost:27017".to_string(),
            kafka_bootstrap_servers: "kafka-1:9092,,kafka-2:9092".to_string(),
            jwt_expiration: "forever".to_string(),
            log_level: "loud".to_string(),
            elasticsearch_url: "localhost:9200".to_string(),
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        assert_eq!(
            fields(&report.errors),
            vec![
                PORT,
                MONGO_URI,
                KAFKA_BOOTSTRAP_SERVERS,
                JWT_EXPIRATION,
                LOG_LEVEL,
                ELASTICSEARCH_URL
            ]
        );
    }

    #[test]
    fn test_production_checks() {
        let config = Config {
            node_env: "production".to_string(),
            log_level: "debug".to_string(),
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        assert_eq!(fields(&report.errors), vec![JWT_SECRET]);
        assert_eq!(fields(&report.warnings), vec![LOG_LEVEL]);
    }

    #[test]
    fn test_warnings() {
        let config = Config {
            port: "80".to_string(),
            node_env: "staging".to_string(),
            jwt_secret: "short".to_string(),
            max_notifications_per_hour: 0,
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        assert!(report.is_valid());
        assert_eq!(
            fields(&report.warnings),
            vec![PORT, NODE_ENV, JWT_SECRET, MAX_NOTIFICATIONS_PER_HOUR]
        );
    }

    #[test]
    fn test_log_level_must_match_exactly() {
        for level in ["WARNING", "warning", "Info", " debug"] {
            let config = Config {
                log_level: level.to_string(),
                ..Config::default()
            };
            let report = ConfigValidator::validate(&config);
            assert_eq!(fields(&report.errors), vec![LOG_LEVEL], "{} accepted", level);
        }
    }

    #[test]
    fn test_environment_alias_is_unknown() {
        let config = Config {
            node_env: "prod".to_string(),
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(fields(&report.warnings), vec![NODE_ENV, JWT_SECRET]);
    }

    #[test]
    fn test_zero_port_and_lifetime_rejected() {
        let config = Config {
            port: "0".to_string(),
            jwt_expiration: "0s".to_string(),
            ..Config::default()
        };
        let report = ConfigValidator::validate(&config);
        assert_eq!(fields(&report.errors), vec![PORT, JWT_EXPIRATION]);
    }
}
