//! Knowledge store errors
//!
//! Only malformed input is an error. Unknown rules or facts are reported
//! as negative results by the store methods themselves.

use thiserror::Error;

use super::types::RuleId;

/// Result type for knowledge store operations
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Knowledge store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    #[error("Attribute name must not be empty")]
    EmptyAttribute,

    #[error("Rule must have at least one condition")]
    NoConditions,

    #[error("Invalid rule id: {0} (ids are positive)")]
    InvalidRuleId(RuleId),

    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    #[error("Invalid knowledge document: {0}")]
    InvalidDocument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            KnowledgeError::DuplicateRuleId(3).to_string(),
            "Duplicate rule id: 3"
        );
        assert!(KnowledgeError::NoConditions
            .to_string()
            .contains("at least one condition"));
    }
}
