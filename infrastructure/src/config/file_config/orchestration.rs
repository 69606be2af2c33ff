//! Orchestration configuration from TOML (`[orchestration]` section)

use super::ConfigValidationError;
use rag_application::OrchestrationParams;
use rag_domain::{RefinementLimits, SelectionStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw orchestration configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestration]
/// max_iterations = 3
/// confidence_threshold = 0.8
/// domain_relevance_threshold = 0.7
/// max_tools = 5
/// strategy = "hybrid"            # "performance", "category", "relevance", "hybrid"
/// max_workers = 5
/// task_timeout_seconds = 30
/// max_refinement_terms = 5
/// max_query_chars = 512
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    pub max_iterations: usize,
    pub confidence_threshold: f64,
    pub domain_relevance_threshold: f64,
    pub max_tools: usize,
    pub strategy: String,
    pub max_workers: usize,
    pub task_timeout_seconds: u64,
    pub max_refinement_terms: usize,
    pub max_query_chars: usize,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            max_iterations: params.max_iterations,
            confidence_threshold: params.confidence_threshold,
            domain_relevance_threshold: params.domain_relevance_threshold,
            max_tools: params.max_tools,
            strategy: params.strategy.as_str().to_string(),
            max_workers: params.max_workers,
            task_timeout_seconds: params.task_timeout.as_secs(),
            max_refinement_terms: params.refinement.max_terms,
            max_query_chars: params.refinement.max_query_chars,
        }
    }
}

impl FileOrchestrationConfig {
    /// Check every field, returning all problems found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let non_zero = [
            ("orchestration.max_iterations", self.max_iterations as u64),
            ("orchestration.max_workers", self.max_workers as u64),
            ("orchestration.max_tools", self.max_tools as u64),
            ("orchestration.task_timeout_seconds", self.task_timeout_seconds),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                errors.push(ConfigValidationError::Zero { field });
            }
        }

        let thresholds = [
            ("orchestration.confidence_threshold", self.confidence_threshold),
            (
                "orchestration.domain_relevance_threshold",
                self.domain_relevance_threshold,
            ),
        ];
        for (field, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigValidationError::ThresholdOutOfRange { field, value });
            }
        }

        if let Err(e) = self.parse_strategy() {
            errors.push(e);
        }

        errors
    }

    pub fn parse_strategy(&self) -> Result<SelectionStrategy, ConfigValidationError> {
        self.strategy
            .parse::<SelectionStrategy>()
            .map_err(|_| ConfigValidationError::UnknownStrategy {
                value: self.strategy.clone(),
                valid: SelectionStrategy::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Convert into application parameters, rejecting invalid values.
    pub fn to_params(&self) -> Result<OrchestrationParams, ConfigValidationError> {
        if let Some(error) = self.validate().into_iter().next() {
            return Err(error);
        }

        Ok(OrchestrationParams::default()
            .with_max_iterations(self.max_iterations)
            .with_confidence_threshold(self.confidence_threshold)
            .with_domain_relevance_threshold(self.domain_relevance_threshold)
            .with_max_tools(self.max_tools)
            .with_strategy(self.parse_strategy()?)
            .with_max_workers(self.max_workers)
            .with_task_timeout(Duration::from_secs(self.task_timeout_seconds))
            .with_refinement(RefinementLimits {
                max_terms: self.max_refinement_terms,
                max_query_chars: self.max_query_chars,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let params = FileOrchestrationConfig::default().to_params().unwrap();
        let expected = OrchestrationParams::default();
        assert_eq!(params.max_iterations, expected.max_iterations);
        assert_eq!(params.strategy, SelectionStrategy::Hybrid);
        assert_eq!(params.task_timeout, Duration::from_secs(30));
        assert_eq!(params.refinement, expected.refinement);
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = FileOrchestrationConfig {
            max_iterations: 0,
            max_workers: 0,
            ..Default::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("max_iterations"));
        assert!(config.to_params().is_err());
    }

    #[test]
    fn test_threshold_range() {
        let config = FileOrchestrationConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().as_slice(),
            [ConfigValidationError::ThresholdOutOfRange { .. }]
        ));
    }

    #[test]
    fn test_unknown_strategy_lists_valid_names() {
        let config = FileOrchestrationConfig {
            strategy: "fastest".to_string(),
            ..Default::default()
        };
        let message = config.to_params().unwrap_err().to_string();
        assert!(message.contains("fastest"));
        assert!(message.contains("performance, category, relevance, hybrid"));
    }
}
