//! Command line interface definitions

use clap::{Parser, Subcommand, ValueEnum};
use config::loader::DEFAULT_ENV_FILE;
use config::MalformedPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "notifier", version, about = "Notification service configuration")]
pub struct Cli {
    /// Settings file loaded before resolution
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Ignore the settings file and read only the process environment
    #[arg(long, global = true, conflicts_with = "env_file")]
    pub no_env_file: bool,

    /// Use the default notification limit when the supplied one is not an integer
    #[arg(long, global = true)]
    pub lenient_limits: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve and validate the configuration, then print the report
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every resolved setting and where it came from
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
        /// Print secret values instead of masking them
        #[arg(long)]
        reveal_secrets: bool,
    },
    /// Write a settings file listing every setting with its default
    Example {
        #[arg(long, short)]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl Cli {
    pub fn policy(&self) -> MalformedPolicy {
        if self.lenient_limits {
            MalformedPolicy::UseDefault
        } else {
            MalformedPolicy::Reject
        }
    }

    /// Settings file to read, if any
    pub fn env_file(&self) -> Option<PathBuf> {
        if self.no_env_file {
            None
        } else {
            Some(self.env_file.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["notifier"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.env_file(), Some(PathBuf::from(".env")));
        assert_eq!(cli.policy(), MalformedPolicy::Reject);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "notifier",
            "show",
            "--format",
            "json",
            "--lenient-limits",
            "--env-file",
            "deploy/notifier.env",
        ])
        .unwrap();
        assert_eq!(cli.policy(), MalformedPolicy::UseDefault);
        assert_eq!(cli.env_file(), Some(PathBuf::from("deploy/notifier.env")));
        assert!(matches!(
            cli.command,
            Some(Command::Show {
                format: OutputFormat::Json,
                reveal_secrets: false
            })
        ));
    }

    #[test]
    fn test_no_env_file() {
        let cli = Cli::try_parse_from(["notifier", "check", "--no-env-file"]).unwrap();
        assert_eq!(cli.env_file(), None);
        assert!(matches!(cli.command, Some(Command::Check { json: false })));
    }

    #[test]
    fn test_example_requires_output() {
        assert!(Cli::try_parse_from(["notifier", "example"]).is_err());
        let cli = Cli::try_parse_from(["notifier", "example", "-o", ".env.example"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Example { force: false, .. })));
    }
}
