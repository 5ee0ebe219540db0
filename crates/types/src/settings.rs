//! Typed views over string-valued settings

use std::fmt;
use std::str::FromStr;

/// Deployment environment named by `NODE_ENV`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
    /// Any other name, kept verbatim
    Other(String),
}

impl Environment {
    /// Parse an environment name. Never fails; anything other than the
    /// exact names `development`, `production` and `test` becomes `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "development" => Self::Development,
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Log verbosity named by `LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Every accepted level name
    pub const NAMES: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Self::Debug | Self::Trace)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Exact, case-sensitive match on one of [`LogLevel::NAMES`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!(
                "Unknown log level '{}'. Valid levels: {:?}",
                other,
                Self::NAMES
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(
            Environment::parse("staging"),
            Environment::Other("staging".to_string())
        );
        assert!(!Environment::parse("staging").is_known());
        assert_eq!(Environment::parse("staging").to_string(), "staging");
    }

    #[test]
    fn test_environment_aliases_are_not_known() {
        for name in ["prod", "dev", "testing", "PRODUCTION", " production"] {
            let environment = Environment::parse(name);
            assert_eq!(environment, Environment::Other(name.to_string()));
            assert!(!environment.is_production());
        }
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::default(), LogLevel::Info);
        for name in LogLevel::NAMES {
            assert_eq!(name.parse::<LogLevel>().unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_log_level_rejects_variants() {
        for name in ["WARN", "warning", "WARNING", " error ", "Info"] {
            assert!(name.parse::<LogLevel>().is_err(), "{} accepted", name);
        }
    }
}
