//! Configuration file
//!
//! ```json
//! {
//!   "kb_path": "kb.json",
//!   "max_iterations": 50,
//!   "max_proof_depth": 256,
//!   "log_level": "warn",
//!   "log_format": "text",
//!   "explain_after_prove": true
//! }
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inference::{DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_PROOF_DEPTH};
use crate::observability::{validate_level, Event, LogFormat};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Knowledge base file
    #[serde(default = "default_kb_path")]
    pub kb_path: String,

    /// Forward-chaining round cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Backward-chaining recursion bound
    #[serde(default = "default_max_proof_depth")]
    pub max_proof_depth: usize,

    /// Default tracing level, `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Print the derivation after a successful proof and a diagnosis
    /// after a failed one
    #[serde(default = "default_explain_after_prove")]
    pub explain_after_prove: bool,
}

fn default_kb_path() -> String {
    "kb.json".to_string()
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
fn default_max_proof_depth() -> usize {
    DEFAULT_MAX_PROOF_DEPTH
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_explain_after_prove() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kb_path: default_kb_path(),
            max_iterations: default_max_iterations(),
            max_proof_depth: default_max_proof_depth(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            explain_after_prove: default_explain_after_prove(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        info!(event = %Event::ConfigLoaded, path = %path.display(), "configuration loaded");

        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides and re-validates
    pub fn with_overrides(
        mut self,
        kb: Option<&Path>,
        max_iterations: Option<usize>,
    ) -> CliResult<Self> {
        if let Some(kb) = kb {
            self.kb_path = kb.to_string_lossy().into_owned();
        }
        if let Some(n) = max_iterations {
            self.max_iterations = n;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.kb_path.trim().is_empty() {
            return Err(CliError::config_error("kb_path must not be empty"));
        }

        if self.max_iterations == 0 {
            return Err(CliError::config_error("max_iterations must be > 0"));
        }

        if self.max_proof_depth == 0 {
            return Err(CliError::config_error("max_proof_depth must be > 0"));
        }

        validate_level(&self.log_level)
            .map_err(|e| CliError::config_error(e.message().to_string()))?;
        self.format()?;

        Ok(())
    }

    /// Parsed log format
    pub fn format(&self) -> CliResult<LogFormat> {
        self.log_format
            .parse::<LogFormat>()
            .map_err(|e| CliError::config_error(e.message().to_string()))
    }

    /// Knowledge base file as a path
    pub fn kb_path(&self) -> PathBuf {
        PathBuf::from(&self.kb_path)
    }
}
