//! Session errors

use thiserror::Error;

use crate::knowledge::KnowledgeError;
use crate::parser::ParseError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Rejected session operation. The store is unchanged and no undo entry
/// was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}
