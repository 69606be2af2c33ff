//! Tool domain value objects: immutable outcome and error types
//!
//! Every tool invocation produces exactly one [`ToolOutcome`]. Failed
//! outcomes carry a [`ToolError`] whose code places the failure in the
//! taxonomy (validation, execution, malformed output, timeout, not found).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error describing why a tool invocation failed.
///
/// | Code | Description |
/// |------|-------------|
/// | `VALIDATION_FAILED` | Tool rejected the input |
/// | `EXECUTION_FAILED` | Tool raised a fault |
/// | `MALFORMED_OUTPUT` | Tool returned out-of-range data |
/// | `TIMEOUT` | Batch deadline elapsed first |
/// | `NOT_FOUND` | Unknown tool name |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "TIMEOUT", "NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const VALIDATION_FAILED: &'static str = "VALIDATION_FAILED";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const MALFORMED_OUTPUT: &'static str = "MALFORMED_OUTPUT";
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const NOT_FOUND: &'static str = "NOT_FOUND";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn validation_failed(tool: impl Into<String>) -> Self {
        Self::new(
            Self::VALIDATION_FAILED,
            format!("Input validation failed for tool {}", tool.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn malformed_output(message: impl Into<String>) -> Self {
        Self::new(Self::MALFORMED_OUTPUT, message)
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Tool did not finish within {:.1}s", timeout.as_secs_f64()),
        )
    }

    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, format!("Tool {} not found", tool.into()))
    }

    pub fn is_timeout(&self) -> bool {
        self.code == Self::TIMEOUT
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// One retrieved item: free-form content plus optional attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ResultRecord {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            url: None,
            score: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Result of one tool invocation.
///
/// Built once by the tool (or by the registry for failures) and never
/// modified after it is committed to a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Name of the tool that produced this outcome
    pub tool_name: String,
    /// Whether the invocation succeeded
    pub success: bool,
    /// Retrieved records, in the tool's own ranking order
    #[serde(default)]
    pub records: Vec<ResultRecord>,
    /// Source identifiers (usually URLs)
    #[serde(default)]
    pub sources: Vec<String>,
    /// Tool's confidence in its records, in [0, 1]
    pub confidence: f64,
    /// Wall-clock latency of the invocation
    #[serde(with = "crate::core::duration_ms", rename = "latency_ms")]
    pub latency: Duration,
    /// Error information (for failed invocations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(tool_name: impl Into<String>, records: Vec<ResultRecord>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            records,
            sources: Vec::new(),
            confidence: 0.0,
            latency: Duration::ZERO,
            error: None,
        }
    }

    /// Create a failed outcome
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            records: Vec::new(),
            sources: Vec::new(),
            confidence: 0.0,
            latency: Duration::ZERO,
            error: Some(error),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Check if the invocation was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Check whether this outcome was produced by a batch timeout
    pub fn is_timeout(&self) -> bool {
        self.error.as_ref().is_some_and(ToolError::is_timeout)
    }

    /// Reject outcomes whose numeric fields are out of range.
    ///
    /// Confidence must be finite and within [0, 1]; record scores must be
    /// finite. A successful outcome must not carry an error and a failed
    /// one must.
    pub fn check_well_formed(&self) -> Result<(), String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.score.is_some_and(|s| !s.is_finite()))
        {
            return Err(format!("non-finite record score in '{}'", record.content));
        }
        if self.success && self.error.is_some() {
            return Err("successful outcome carries an error".to_string());
        }
        if !self.success && self.error.is_none() {
            return Err("failed outcome carries no error".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::not_found("web_search").with_details("unregistered");

        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("web_search"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("(unregistered)"));
    }

    #[test]
    fn test_timeout_error() {
        let err = ToolError::timeout(Duration::from_millis(1500));
        assert!(err.is_timeout());
        assert!(err.message.contains("1.5s"));
    }

    #[test]
    fn test_outcome_success() {
        let outcome = ToolOutcome::success(
            "knowledge_base",
            vec![ResultRecord::new("EC2 instance types").with_score(0.8)],
        )
        .with_sources(vec!["https://docs.aws.amazon.com/ec2/".into()])
        .with_confidence(0.7);

        assert!(outcome.is_success());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.sources.len(), 1);
        assert!(outcome.check_well_formed().is_ok());
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = ToolOutcome::failure("web_search", ToolError::timeout(Duration::from_secs(1)));

        assert!(!outcome.is_success());
        assert!(outcome.records.is_empty());
        assert!(outcome.is_timeout());
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn test_malformed_confidence() {
        let outcome = ToolOutcome::success("t", vec![]).with_confidence(1.5);
        assert!(outcome.check_well_formed().is_err());

        let outcome = ToolOutcome::success("t", vec![]).with_confidence(f64::NAN);
        assert!(outcome.check_well_formed().is_err());
    }

    #[test]
    fn test_failure_without_error_is_malformed() {
        let mut outcome = ToolOutcome::success("t", vec![]);
        outcome.success = false;
        let reason = outcome.check_well_formed().unwrap_err();
        assert!(reason.contains("no error"));

        let outcome = ToolOutcome::failure("t", ToolError::execution_failed("down"));
        assert!(outcome.check_well_formed().is_ok());
    }

    #[test]
    fn test_malformed_score() {
        let outcome =
            ToolOutcome::success("t", vec![ResultRecord::new("x").with_score(f64::INFINITY)]);
        assert!(outcome.check_well_formed().is_err());
    }

    #[test]
    fn test_outcome_serializes_latency_ms() {
        let outcome = ToolOutcome::success("t", vec![]).with_latency(Duration::from_millis(20));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["latency_ms"], serde_json::json!(20.0));
        assert!(value.get("error").is_none());
    }
}
