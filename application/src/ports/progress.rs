//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is processed.

use rag_domain::AgentResponse;

/// Callback for progress updates during orchestration
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, ...).
pub trait OrchestrationProgress: Send + Sync {
    /// Called when a pass starts
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize);

    /// Called after selection with the tools about to run
    fn on_tools_selected(&self, tools: &[String]);

    /// Called when one tool in the batch finishes (timeouts included)
    fn on_tool_complete(&self, tool: &str, success: bool);

    /// Called with the quality score of a pass
    fn on_assessed(&self, _iteration: usize, _score: f64) {}

    /// Called once the response is final
    fn on_complete(&self, _response: &AgentResponse) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl OrchestrationProgress for NoProgress {
    fn on_iteration_start(&self, _iteration: usize, _max_iterations: usize) {}
    fn on_tools_selected(&self, _tools: &[String]) {}
    fn on_tool_complete(&self, _tool: &str, _success: bool) {}
}
