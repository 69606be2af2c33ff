//! Agent response value object

use crate::tool::value_objects::ToolOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Returned when retrieval produced no records.
pub const NO_RESULTS_TEXT: &str = "I couldn't find specific information about your query in my knowledge base. \
This might be a very specific or new issue. Could you provide more details \
or try rephrasing your question?";

/// Returned when every pass fell short and no candidate was kept.
pub const FALLBACK_TEXT: &str = "I'm having difficulty providing a comprehensive answer to your query. \
Could you please provide more specific details about your cloud service issue?";

/// Returned for queries outside the supported domain.
pub const IRRELEVANT_TEXT: &str = "I specialize in AWS and Azure cloud services troubleshooting and advisory. \
Your query doesn't seem to be related to cloud services. \
Could you please clarify your question?";

pub const CLARIFICATION_QUESTIONS: [&str; 3] = [
    "Are you asking about AWS or Azure cloud services?",
    "Is this related to cloud infrastructure or configuration?",
    "Could you specify which cloud service you're having issues with?",
];

pub const ERROR_PREFIX: &str =
    "I apologize, but I encountered an error while processing your request: ";

pub const DETAIL_NOTE: &str = "\n\n*Detailed explanation provided based on your preferences.*";

pub const MODERATE_CONFIDENCE_NOTE: &str =
    "\n\n*Note: This response has moderate confidence. Please verify the information.*";

/// Confidence below which the moderate-confidence note is appended
pub const MODERATE_CONFIDENCE_THRESHOLD: f64 = 0.7;

pub const FALLBACK_CONFIDENCE: f64 = 0.3;
pub const IRRELEVANT_CONFIDENCE: f64 = 0.5;

/// Final answer for one query.
///
/// Always carries user-visible content, even when every tool failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub sources: Vec<String>,
    /// Outcomes of the batch that produced this response, keyed by tool name
    #[serde(default)]
    pub tool_outcomes: BTreeMap<String, ToolOutcome>,
    /// End-to-end processing time
    #[serde(with = "crate::core::duration_ms", rename = "latency_ms")]
    pub latency: Duration,
    pub language: String,
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarification_questions: Vec<String>,
}

impl AgentResponse {
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence,
            sources: Vec::new(),
            tool_outcomes: BTreeMap::new(),
            latency: Duration::ZERO,
            language: "en".to_string(),
            needs_clarification: false,
            clarification_questions: Vec::new(),
        }
    }

    /// Uniform response for a failure while handling the request
    pub fn error(description: &str) -> Self {
        Self::new(format!("{}{}", ERROR_PREFIX, description), 0.0)
    }

    /// Response used when the iteration budget ran out with nothing kept
    pub fn fallback() -> Self {
        let mut response = Self::new(FALLBACK_TEXT, FALLBACK_CONFIDENCE);
        response.needs_clarification = true;
        response
    }

    /// Clarification request for out-of-domain queries
    pub fn irrelevant() -> Self {
        Self::new(IRRELEVANT_TEXT, IRRELEVANT_CONFIDENCE).with_clarification(
            CLARIFICATION_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect(),
        )
    }

    // ==================== Builder Methods ====================

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_tool_outcomes(mut self, outcomes: BTreeMap<String, ToolOutcome>) -> Self {
        self.tool_outcomes = outcomes;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_clarification(mut self, questions: Vec<String>) -> Self {
        self.needs_clarification = true;
        self.clarification_questions = questions;
        self
    }

    /// Flag the response as needing more detail from the user
    pub fn needing_clarification(mut self) -> Self {
        self.needs_clarification = true;
        self
    }

    /// Append the preference and confidence notes.
    pub fn finalize(&mut self, detailed_responses: bool) {
        if detailed_responses {
            self.content.push_str(DETAIL_NOTE);
        }
        if self.confidence < MODERATE_CONFIDENCE_THRESHOLD {
            self.content.push_str(MODERATE_CONFIDENCE_NOTE);
        }
    }

    /// Names of tools whose outcome succeeded, in name order
    pub fn successful_tools(&self) -> impl Iterator<Item = &str> {
        self.tool_outcomes
            .values()
            .filter(|o| o.is_success())
            .map(|o| o.tool_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::{ToolError, ToolOutcome};

    #[test]
    fn test_error_response() {
        let response = AgentResponse::error("classifier unavailable");
        assert_eq!(response.confidence, 0.0);
        assert!(response.sources.is_empty());
        assert!(response.content.ends_with("classifier unavailable"));
        assert!(!response.needs_clarification);
    }

    #[test]
    fn test_fallback_needs_clarification() {
        let response = AgentResponse::fallback();
        assert_eq!(response.confidence, FALLBACK_CONFIDENCE);
        assert!(response.needs_clarification);
        assert!(!response.content.is_empty());
    }

    #[test]
    fn test_irrelevant_has_three_questions() {
        let response = AgentResponse::irrelevant();
        assert_eq!(response.confidence, 0.5);
        assert!(response.needs_clarification);
        assert_eq!(response.clarification_questions.len(), 3);
    }

    #[test]
    fn test_finalize_notes() {
        let mut low = AgentResponse::new("answer", 0.5);
        low.finalize(true);
        assert!(low.content.contains("Detailed explanation"));
        assert!(low.content.contains("moderate confidence"));

        let mut high = AgentResponse::new("answer", 0.9);
        high.finalize(false);
        assert_eq!(high.content, "answer");
    }

    #[test]
    fn test_successful_tools() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert("b".to_string(), ToolOutcome::success("b", vec![]));
        outcomes.insert(
            "a".to_string(),
            ToolOutcome::failure("a", ToolError::execution_failed("x")),
        );
        let response = AgentResponse::new("c", 0.1).with_tool_outcomes(outcomes);
        assert_eq!(response.successful_tools().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_serialize_shape() {
        let response = AgentResponse::new("c", 0.8).with_latency(Duration::from_millis(5));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["latency_ms"], serde_json::json!(5.0));
        assert_eq!(value["needs_clarification"], serde_json::json!(false));
    }
}
