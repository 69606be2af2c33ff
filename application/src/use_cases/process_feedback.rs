//! Process Feedback use case.
//!
//! Records a user's feedback on a response and folds the preference updates
//! derived from their feedback history back into the memory store.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::error::CollaboratorError;
use crate::ports::feedback_analyzer::FeedbackAnalyzer;
use crate::ports::memory_store::MemoryStore;
use rag_domain::{Feedback, FeedbackType, Preferences};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ProcessFeedbackError {
    #[error("Failed to record feedback: {0}")]
    Record(#[source] CollaboratorError),

    #[error("Failed to analyze feedback: {0}")]
    Analyze(#[source] CollaboratorError),

    #[error("Failed to update preferences: {0}")]
    UpdatePreferences(#[source] CollaboratorError),
}

/// Input for the [`ProcessFeedbackUseCase`].
#[derive(Debug, Clone)]
pub struct ProcessFeedbackInput {
    pub user_id: String,
    pub thread_id: String,
    pub message_id: String,
    pub feedback_type: FeedbackType,
}

impl ProcessFeedbackInput {
    pub fn new(
        user_id: impl Into<String>,
        thread_id: impl Into<String>,
        message_id: impl Into<String>,
        feedback_type: FeedbackType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: thread_id.into(),
            message_id: message_id.into(),
            feedback_type,
        }
    }
}

pub struct ProcessFeedbackUseCase {
    analyzer: Arc<dyn FeedbackAnalyzer>,
    memory: Arc<dyn MemoryStore>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ProcessFeedbackUseCase {
    pub fn new(analyzer: Arc<dyn FeedbackAnalyzer>, memory: Arc<dyn MemoryStore>) -> Self {
        Self {
            analyzer,
            memory,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Record the feedback and return the preference updates that were applied.
    pub async fn execute(
        &self,
        input: ProcessFeedbackInput,
    ) -> Result<Preferences, ProcessFeedbackError> {
        let feedback = Feedback::new(
            &input.user_id,
            &input.thread_id,
            &input.message_id,
            input.feedback_type,
        );
        info!(
            user = %feedback.user_id,
            message = %feedback.message_id,
            "Recording {} feedback",
            feedback.feedback_type
        );

        self.analyzer
            .record_feedback(&feedback)
            .await
            .map_err(ProcessFeedbackError::Record)?;

        let updates = self
            .analyzer
            .analyze_user_patterns(&feedback.user_id)
            .await
            .map_err(ProcessFeedbackError::Analyze)?;

        if !updates.is_empty() {
            self.memory
                .update_user_preferences(&feedback.user_id, updates.clone())
                .await
                .map_err(ProcessFeedbackError::UpdatePreferences)?;
        }

        self.conversation_logger.log(ConversationEvent::new(
            "feedback_received",
            json!({
                "user_id": feedback.user_id,
                "thread_id": feedback.thread_id,
                "message_id": feedback.message_id,
                "feedback_type": feedback.feedback_type.as_str(),
                "preference_updates": updates,
            }),
        ));

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::memory_store::Interaction;
    use async_trait::async_trait;
    use rag_domain::Turn;
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingAnalyzer {
        recorded: Mutex<Vec<Feedback>>,
        fail: bool,
    }

    #[async_trait]
    impl FeedbackAnalyzer for CountingAnalyzer {
        async fn record_feedback(&self, feedback: &Feedback) -> Result<(), CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::FeedbackAnalyzer("store closed".into()));
            }
            self.recorded.lock().unwrap().push(feedback.clone());
            Ok(())
        }

        async fn analyze_user_patterns(
            &self,
            user_id: &str,
        ) -> Result<Preferences, CollaboratorError> {
            let recorded = self.recorded.lock().unwrap();
            let too_detailed = recorded
                .iter()
                .filter(|f| f.user_id == user_id && f.feedback_type == FeedbackType::TooDetailed)
                .count();
            let mut updates = Preferences::new();
            if too_detailed > 0 {
                updates.insert("detailed_responses".into(), Value::Bool(false));
            }
            Ok(updates)
        }
    }

    #[derive(Default)]
    struct PreferenceMemory {
        updates: Mutex<Vec<(String, Preferences)>>,
    }

    #[async_trait]
    impl MemoryStore for PreferenceMemory {
        async fn get_session_history(
            &self,
            _user_id: &str,
            _thread_id: &str,
        ) -> Result<Vec<Turn>, CollaboratorError> {
            Ok(Vec::new())
        }

        async fn get_user_preferences(
            &self,
            _user_id: &str,
        ) -> Result<Preferences, CollaboratorError> {
            Ok(Preferences::new())
        }

        async fn store_interaction(
            &self,
            _user_id: &str,
            _thread_id: &str,
            _interaction: Interaction,
        ) -> Result<(), CollaboratorError> {
            Ok(())
        }

        async fn update_user_preferences(
            &self,
            user_id: &str,
            updates: Preferences,
        ) -> Result<(), CollaboratorError> {
            self.updates
                .lock()
                .unwrap()
                .push((user_id.to_string(), updates));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_feedback_updates_preferences() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let memory = Arc::new(PreferenceMemory::default());
        let use_case = ProcessFeedbackUseCase::new(analyzer.clone(), memory.clone());

        let updates = use_case
            .execute(ProcessFeedbackInput::new(
                "user-1",
                "thread-1",
                "msg-1",
                FeedbackType::TooDetailed,
            ))
            .await
            .unwrap();

        assert_eq!(updates.get("detailed_responses"), Some(&Value::Bool(false)));
        assert_eq!(analyzer.recorded.lock().unwrap().len(), 1);
        let stored = memory.updates.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, "user-1");
    }

    #[tokio::test]
    async fn test_empty_updates_skip_memory() {
        let memory = Arc::new(PreferenceMemory::default());
        let use_case =
            ProcessFeedbackUseCase::new(Arc::new(CountingAnalyzer::default()), memory.clone());

        let updates = use_case
            .execute(ProcessFeedbackInput::new("u", "t", "m", FeedbackType::Positive))
            .await
            .unwrap();

        assert!(updates.is_empty());
        assert!(memory.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_failure_is_reported() {
        let use_case = ProcessFeedbackUseCase::new(
            Arc::new(CountingAnalyzer {
                fail: true,
                ..Default::default()
            }),
            Arc::new(PreferenceMemory::default()),
        );

        let err = use_case
            .execute(ProcessFeedbackInput::new("u", "t", "m", FeedbackType::Negative))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessFeedbackError::Record(_)));
        assert!(err.to_string().contains("store closed"));
    }
}
