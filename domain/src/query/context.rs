//! Query context entity

use super::query_type::QueryType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form user preference map (`web_search_enabled`, `detailed_responses`, ...).
pub type Preferences = serde_json::Map<String, Value>;

/// One prior exchange in a thread, most recent last in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub query: String,
    pub response: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(query: impl Into<String>, response: impl Into<String>, confidence: f64) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            confidence,
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of everything known about a query for one loop iteration.
///
/// `query` always holds the English working text; `language` records the
/// caller's language so responses can be translated back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub user_id: String,
    pub thread_id: String,
    pub query: String,
    pub language: String,
    pub query_type: QueryType,
    /// Domain relevance in [0, 1]
    pub domain_relevance: f64,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
    pub session_history: Vec<Turn>,
    pub preferences: Preferences,
}

impl QueryContext {
    pub fn new(
        user_id: impl Into<String>,
        thread_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: thread_id.into(),
            query: query.into(),
            language: "en".to_string(),
            query_type: QueryType::General,
            domain_relevance: 0.0,
            confidence: 0.0,
            session_history: Vec::new(),
            preferences: Preferences::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    /// Set relevance and confidence, clamped to [0, 1]
    pub fn with_scores(mut self, domain_relevance: f64, confidence: f64) -> Self {
        self.domain_relevance = clamp_unit(domain_relevance);
        self.confidence = clamp_unit(confidence);
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.session_history = history;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Produce the context for the next iteration.
    ///
    /// Everything except the working query text is carried over unchanged.
    pub fn with_refined_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }

    // ==================== Accessors ====================

    pub fn is_english(&self) -> bool {
        self.language == "en"
    }

    /// Boolean preference, `default` when absent or not a boolean
    pub fn preference_flag(&self, key: &str, default: bool) -> bool {
        self.preferences
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// String preference, `None` when absent or not a string
    pub fn preference_str(&self, key: &str) -> Option<&str> {
        self.preferences.get(key).and_then(Value::as_str)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
