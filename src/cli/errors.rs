//! CLI-specific error types
//!
//! Library errors are mapped onto stable `KB_CLI_*` codes here so the
//! binary can print one line per failure.

use std::fmt;
use std::io;

use crate::knowledge::KnowledgeError;
use crate::parser::ParseError;
use crate::session::SessionError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// File or terminal I/O error
    IoError,
    /// Rule or fact text could not be parsed
    InvalidInput,
    /// Knowledge base file or operation rejected by the store
    InvalidKnowledgeBase,
    /// Unrecognised shell command or arguments
    UnknownCommand,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "KB_CLI_CONFIG_ERROR",
            Self::IoError => "KB_CLI_IO_ERROR",
            Self::InvalidInput => "KB_CLI_INVALID_INPUT",
            Self::InvalidKnowledgeBase => "KB_CLI_INVALID_KB",
            Self::UnknownCommand => "KB_CLI_UNKNOWN_COMMAND",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn unknown_command(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::UnknownCommand, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<KnowledgeError> for CliError {
    fn from(e: KnowledgeError) -> Self {
        Self::new(CliErrorCode::InvalidKnowledgeBase, e.to_string())
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Parse(e) => e.into(),
            SessionError::Knowledge(e) => e.into(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
