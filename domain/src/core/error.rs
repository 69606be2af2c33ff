//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid selection strategy: {0} (expected performance, category, relevance or hybrid)")]
    InvalidStrategy(String),

    #[error("Invalid query type: {0}")]
    InvalidQueryType(String),

    #[error("Invalid feedback type: {0}")]
    InvalidFeedbackType(String),

    #[error("Invalid output format: {0} (expected text, full or json)")]
    InvalidOutputFormat(String),

    #[error("Orchestration error: {0}")]
    OrchestrationError(String),
}

impl DomainError {
    /// Check if this error was produced while parsing user-supplied input
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DomainError::OrchestrationError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_strategy_display() {
        let error = DomainError::InvalidStrategy("fastest".to_string());
        assert!(error.to_string().contains("fastest"));
        assert!(error.to_string().contains("hybrid"));
    }

    #[test]
    fn test_is_parse_error() {
        assert!(DomainError::InvalidQueryType("x".into()).is_parse_error());
        assert!(DomainError::InvalidFeedbackType("x".into()).is_parse_error());
        assert!(!DomainError::OrchestrationError("x".into()).is_parse_error());
    }
}
