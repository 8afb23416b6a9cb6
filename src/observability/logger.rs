//! Logging setup for kbagent
//!
//! - Structured logs through `tracing`
//! - Text or JSON lines on stderr, stdout stays reserved for command output
//! - `RUST_LOG` overrides the configured level

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use super::{ObservabilityError, ObservabilityResult};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::new(format!(
                "Unknown log format '{}'. Expected 'text' or 'json'.",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks that a level name is one `tracing` understands
pub fn validate_level(level: &str) -> ObservabilityResult<()> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
        other => Err(ObservabilityError::new(format!(
            "Unknown log level '{}'",
            other
        ))),
    }
}

/// Installs the global subscriber.
///
/// Safe to call more than once: later calls leave the first subscriber in
/// place and return `Ok(false)`.
pub fn init_logging(level: &str, format: LogFormat) -> ObservabilityResult<bool> {
    validate_level(level)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.trim().to_ascii_lowercase()))
        .map_err(|e| ObservabilityError::new(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    Ok(installed)
}
