//! Feedback tally and preference inference.

use async_trait::async_trait;
use rag_application::ports::error::CollaboratorError;
use rag_application::ports::feedback_analyzer::FeedbackAnalyzer;
use rag_domain::{Feedback, FeedbackType, Preferences};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Negative feedback needed before web search is switched back on
const NEGATIVE_STREAK_MIN: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackCounts {
    pub positive: usize,
    pub negative: usize,
    pub too_detailed: usize,
    pub not_detailed_enough: usize,
    pub wrong_language: usize,
}

impl FeedbackCounts {
    fn add(&mut self, feedback_type: FeedbackType) {
        match feedback_type {
            FeedbackType::Positive => self.positive += 1,
            FeedbackType::Negative => self.negative += 1,
            FeedbackType::TooDetailed => self.too_detailed += 1,
            FeedbackType::NotDetailedEnough => self.not_detailed_enough += 1,
            FeedbackType::WrongLanguage => self.wrong_language += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive
            + self.negative
            + self.too_detailed
            + self.not_detailed_enough
            + self.wrong_language
    }
}

/// Keeps every feedback event in memory and derives preferences from the
/// per-user tallies.
///
/// | Pattern | Update |
/// |---------|--------|
/// | more `too_detailed` than `not_detailed_enough` | `detailed_responses = false` |
/// | more `not_detailed_enough` than `too_detailed` | `detailed_responses = true` |
/// | at least 3 negatives, outnumbering positives | `web_search_enabled = true` |
/// | any `wrong_language` | `language = "auto"` |
#[derive(Default)]
pub struct TallyFeedbackAnalyzer {
    events: RwLock<Vec<Feedback>>,
}

impl TallyFeedbackAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn counts(&self, user_id: &str) -> FeedbackCounts {
        let events = self.events.read().await;
        let mut counts = FeedbackCounts::default();
        for feedback in events.iter().filter(|f| f.user_id == user_id) {
            counts.add(feedback.feedback_type);
        }
        counts
    }
}

#[async_trait]
impl FeedbackAnalyzer for TallyFeedbackAnalyzer {
    async fn record_feedback(&self, feedback: &Feedback) -> Result<(), CollaboratorError> {
        self.events.write().await.push(feedback.clone());
        Ok(())
    }

    async fn analyze_user_patterns(&self, user_id: &str) -> Result<Preferences, CollaboratorError> {
        let counts = self.counts(user_id).await;
        let mut updates = Preferences::new();

        if counts.too_detailed > counts.not_detailed_enough {
            updates.insert("detailed_responses".into(), Value::Bool(false));
        } else if counts.not_detailed_enough > counts.too_detailed {
            updates.insert("detailed_responses".into(), Value::Bool(true));
        }

        if counts.negative >= NEGATIVE_STREAK_MIN && counts.negative > counts.positive {
            updates.insert("web_search_enabled".into(), Value::Bool(true));
        }

        if counts.wrong_language > 0 {
            updates.insert("language".into(), Value::from("auto"));
        }

        debug!(user = %user_id, total = counts.total(), updates = updates.len(), "Analyzed feedback");
        Ok(updates)
    }
}
