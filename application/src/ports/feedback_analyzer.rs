//! Feedback analysis port

use super::error::CollaboratorError;
use async_trait::async_trait;
use rag_domain::{Feedback, Preferences};

/// Records feedback and derives preference updates from a user's history.
#[async_trait]
pub trait FeedbackAnalyzer: Send + Sync {
    async fn record_feedback(&self, feedback: &Feedback) -> Result<(), CollaboratorError>;

    /// Preference updates inferred from all feedback the user has given
    async fn analyze_user_patterns(&self, user_id: &str) -> Result<Preferences, CollaboratorError>;
}
