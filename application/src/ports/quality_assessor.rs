//! Result-quality scoring port

use rag_domain::ToolOutcome;
use std::collections::BTreeMap;

/// Scores a batch of outcomes against the query that produced them.
pub trait QualityAssessor: Send + Sync {
    /// Quality of the batch in [0, 1]
    fn score(&self, query: &str, outcomes: &BTreeMap<String, ToolOutcome>) -> f64;

    /// Terms that would likely improve the next pass
    fn identify_missing(&self, query: &str, outcomes: &BTreeMap<String, ToolOutcome>)
    -> Vec<String>;

    /// Confidence of a candidate synthesized from `outcomes`.
    ///
    /// Mean confidence of the successful outcomes, 0.0 when none succeeded.
    fn estimate_confidence(&self, _query: &str, outcomes: &BTreeMap<String, ToolOutcome>) -> f64 {
        let confidences: Vec<f64> = outcomes
            .values()
            .filter(|o| o.is_success())
            .map(|o| o.confidence)
            .collect();
        if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_domain::ToolError;

    struct FixedAssessor;

    impl QualityAssessor for FixedAssessor {
        fn score(&self, _query: &str, _outcomes: &BTreeMap<String, ToolOutcome>) -> f64 {
            0.5
        }

        fn identify_missing(
            &self,
            _query: &str,
            _outcomes: &BTreeMap<String, ToolOutcome>,
        ) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_estimate_confidence_ignores_failures() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(
            "a".to_string(),
            ToolOutcome::success("a", vec![]).with_confidence(0.8),
        );
        outcomes.insert(
            "b".to_string(),
            ToolOutcome::success("b", vec![]).with_confidence(0.4),
        );
        outcomes.insert(
            "c".to_string(),
            ToolOutcome::failure("c", ToolError::execution_failed("x")),
        );

        let confidence = FixedAssessor.estimate_confidence("q", &outcomes);
        assert!((confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_confidence_empty() {
        assert_eq!(FixedAssessor.estimate_confidence("q", &BTreeMap::new()), 0.0);
    }
}
