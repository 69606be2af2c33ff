//! Collaborator failure type shared by the ports.

use thiserror::Error;

/// Failure raised by an external collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Translator error: {0}")]
    Translator(String),

    #[error("Memory store error: {0}")]
    MemoryStore(String),

    #[error("Feedback analyzer error: {0}")]
    FeedbackAnalyzer(String),
}
