//! Observability subsystem for kbagent
//!
//! Provides:
//! - Typed event names for engine log lines
//! - `tracing` subscriber setup (text or JSON)
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on inference
//! 3. Logging failure must never abort a command
//!
//! # Usage
//!
//! ```ignore
//! use kbagent::observability::{init_logging, Event, LogFormat};
//!
//! init_logging("info", LogFormat::Json)?;
//! tracing::info!(event = %Event::ForwardComplete, derived = 2, "forward chaining finished");
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init_logging, validate_level, LogFormat};

use std::fmt;

/// Observability error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// Logging setup failed
    KbObservabilityFailed,
}

impl ObservabilityErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::KbObservabilityFailed => "KB_OBSERVABILITY_FAILED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
///
/// Never fatal: the command layer reports it and carries on without logs.
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    /// Create a new observability error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ObservabilityErrorCode::KbObservabilityFailed,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
