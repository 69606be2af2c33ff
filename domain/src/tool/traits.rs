//! Tool capability contract

use super::value_objects::{ToolError, ToolOutcome};
use crate::query::context::QueryContext;
use async_trait::async_trait;

/// A pluggable retrieval or analysis capability.
///
/// Implementations must treat the [`QueryContext`] as read-only: the same
/// context is shared by every tool in a batch.
///
/// `execute` reports faults by returning `Err`; the registry converts those
/// (and panics) into failed outcomes and records them in the ledger.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used as the registry key
    fn name(&self) -> &str;

    /// Human-readable description; the relevance strategy scores against it
    fn description(&self) -> &str;

    /// Category tag (e.g. "search", "analysis", "diagnostic")
    fn category(&self) -> &str;

    /// Whether this tool can handle the query.
    ///
    /// Must be cheap and side-effect free: selection calls it for every
    /// registered tool on every pass.
    fn validate(&self, query: &str, _context: &QueryContext) -> bool {
        !query.trim().is_empty()
    }

    /// Run the tool against the query
    async fn execute(&self, query: &str, context: &QueryContext) -> Result<ToolOutcome, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ResultRecord;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the query back"
        }

        fn category(&self) -> &str {
            "general"
        }

        async fn execute(
            &self,
            query: &str,
            _context: &QueryContext,
        ) -> Result<ToolOutcome, ToolError> {
            Ok(ToolOutcome::success(self.name(), vec![ResultRecord::new(query)]))
        }
    }

    #[test]
    fn test_default_validate_rejects_blank() {
        let ctx = QueryContext::new("u", "t", "");
        assert!(!EchoTool.validate("   ", &ctx));
        assert!(EchoTool.validate("ec2", &ctx));
    }

    #[tokio::test]
    async fn test_execute() {
        let ctx = QueryContext::new("u", "t", "hello");
        let outcome = EchoTool.execute("hello", &ctx).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.records[0].content, "hello");
    }
}
