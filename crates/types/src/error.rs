//! Error types for the notification service

use thiserror::Error;

/// Configuration specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Settings file could not be read or parsed
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Integer setting holds something that is not a base-10 integer
    #[error("Invalid integer for {key}: {value:?}")]
    InvalidInteger { key: String, value: String },

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Process-wide configuration was installed twice
    #[error("Configuration has already been initialized")]
    AlreadyInitialized,
}

impl ConfigError {
    /// Name of the setting this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidInteger { key, .. } => Some(key.as_str()),
            ConfigError::ValidationError { field, .. } => Some(field.as_str()),
            ConfigError::ParseError(_) | ConfigError::AlreadyInitialized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_integer_message() {
        let err = ConfigError::InvalidInteger {
            key: "MAX_NOTIFICATIONS_PER_HOUR".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid integer for MAX_NOTIFICATIONS_PER_HOUR: \"abc\""
        );
        assert_eq!(err.field(), Some("MAX_NOTIFICATIONS_PER_HOUR"));
    }
}
