//! Rule and fact text errors
//!
//! Every variant means the input was rejected as a whole: nothing is
//! partially applied.

use thiserror::Error;

/// Result type for text parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Malformed rule or fact text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty input")]
    Empty,

    #[error("Rule must contain 'SE ... ENTÃO ...'")]
    MissingThen,

    #[error("Rule must contain exactly one 'ENTÃO'")]
    MultipleThen,

    #[error("Left-hand side must start with 'SE'")]
    MissingIf,

    #[error("Could not understand condition: '{0}'")]
    InvalidCondition(String),

    #[error("Conclusion must look like 'Attr = Value': '{0}'")]
    InvalidConclusion(String),

    #[error("Conclusion must use '=' (equality), found '{0}'")]
    NonEqualityConclusion(String),

    #[error("Fact must look like 'Attr = Value': '{0}'")]
    InvalidFact(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

impl From<regex::Error> for ParseError {
    fn from(err: regex::Error) -> Self {
        ParseError::Pattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::InvalidCondition("Febre ~ Sim".into()).to_string(),
            "Could not understand condition: 'Febre ~ Sim'"
        );
        assert!(ParseError::MissingThen.to_string().contains("ENTÃO"));
    }
}
