//! Orchestration parameters: loop control and batch limits.
//!
//! [`OrchestrationParams`] groups the static parameters that control the
//! self-correction loop in
//! [`ProcessQueryUseCase`](crate::use_cases::process_query::ProcessQueryUseCase).
//! These are application-layer concerns, not domain policy.

use rag_domain::{RefinementLimits, SelectionStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Loop control and batch parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum number of select/execute/assess passes.
    pub max_iterations: usize,
    /// Quality score at or above which a candidate is accepted.
    pub confidence_threshold: f64,
    /// Domain relevance below which the loop is skipped for a clarification.
    pub domain_relevance_threshold: f64,
    /// Upper bound on tools selected per pass.
    pub max_tools: usize,
    /// Strategy used by the select phase.
    pub strategy: SelectionStrategy,
    /// Maximum concurrent tool executions within a batch.
    pub max_workers: usize,
    /// Shared deadline for one batch.
    pub task_timeout: Duration,
    /// Caps on query growth between passes.
    pub refinement: RefinementLimits,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            confidence_threshold: 0.8,
            domain_relevance_threshold: 0.7,
            max_tools: 5,
            strategy: SelectionStrategy::Hybrid,
            max_workers: 5,
            task_timeout: Duration::from_secs(30),
            refinement: RefinementLimits::default(),
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_domain_relevance_threshold(mut self, threshold: f64) -> Self {
        self.domain_relevance_threshold = threshold;
        self
    }

    pub fn with_max_tools(mut self, max: usize) -> Self {
        self.max_tools = max;
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_workers(mut self, max: usize) -> Self {
        self.max_workers = max;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementLimits) -> Self {
        self.refinement = refinement;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestrationParams::default();
        assert_eq!(params.max_iterations, 3);
        assert_eq!(params.confidence_threshold, 0.8);
        assert_eq!(params.domain_relevance_threshold, 0.7);
        assert_eq!(params.max_workers, 5);
        assert_eq!(params.task_timeout, Duration::from_secs(30));
        assert_eq!(params.strategy, SelectionStrategy::Hybrid);
    }

    #[test]
    fn test_builder() {
        let params = OrchestrationParams::default()
            .with_max_iterations(1)
            .with_strategy(SelectionStrategy::Category)
            .with_task_timeout(Duration::from_millis(250));

        assert_eq!(params.max_iterations, 1);
        assert_eq!(params.strategy, SelectionStrategy::Category);
        assert_eq!(params.task_timeout, Duration::from_millis(250));
    }
}
