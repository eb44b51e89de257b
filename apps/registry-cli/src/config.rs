//! Configuration for registry-cli.
//!
//! Environment variables are read once at startup; a bad value stops the
//! program before any command runs.

use std::env;
use std::fmt;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// How user collections are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("text") {
            Some(Self::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log format (default: pretty)
    pub log_format: LogFormat,
    /// Output format (default: text)
    pub output_format: OutputFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            env::var("LOG_FORMAT").ok().as_deref(),
            env::var("OUTPUT_FORMAT").ok().as_deref(),
        )
    }

    fn from_vars(log_format: Option<&str>, output_format: Option<&str>) -> Result<Self, ConfigError> {
        let log_format = LogFormat::from_str(log_format.unwrap_or("pretty"));

        let raw_output = output_format.unwrap_or("text");
        let output_format = OutputFormat::parse(raw_output).ok_or_else(|| ConfigError {
            field: "OUTPUT_FORMAT",
            message: format!("expected 'text' or 'json', got '{}'", raw_output),
        })?;

        Ok(Self {
            log_format,
            output_format,
        })
    }
}
