//! Heuristic batch quality assessor.

use rag_application::ports::quality_assessor::QualityAssessor;
use rag_domain::ToolOutcome;
use std::collections::{BTreeMap, HashSet};

const SUCCESS_WEIGHT: f64 = 0.4;
const CONFIDENCE_WEIGHT: f64 = 0.4;
const COVERAGE_WEIGHT: f64 = 0.2;

/// Words shorter than this never count as key terms
const MIN_TERM_LEN: usize = 3;

/// Suggested when the records leave some query terms uncovered, or when a
/// pass returned no records at all
const COVERAGE_HINTS: [&str; 2] = ["documentation", "troubleshooting"];

/// Record terms suggested per pass
const MAX_EXPANSION_TERMS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "was", "our", "out",
    "has", "how", "its", "why", "what", "when", "where", "which", "who", "with", "this",
    "that", "from", "have", "into", "does", "about", "there", "their", "they", "them",
    "then", "than", "should", "would", "could", "been", "being", "your", "my", "is",
];

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Lower-cased query words worth looking for in returned content.
pub fn key_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(query)
        .filter(|w| w.chars().count() >= MIN_TERM_LEN && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Scores a batch by success ratio, tool confidence and term coverage.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAssessor;

impl HeuristicAssessor {
    pub fn new() -> Self {
        Self
    }

    /// Lower-cased text of every record in the successful outcomes
    fn returned_text(outcomes: &BTreeMap<String, ToolOutcome>) -> Option<String> {
        let mut text = String::new();
        for record in outcomes
            .values()
            .filter(|o| o.is_success())
            .flat_map(|o| o.records.iter())
        {
            text.push_str(&record.content.to_lowercase());
            text.push('\n');
            if let Some(title) = &record.title {
                text.push_str(&title.to_lowercase());
                text.push('\n');
            }
        }
        (!text.is_empty()).then_some(text)
    }

    /// Key terms of the most confident successful records, in order of
    /// appearance, excluding every word already in the query.
    fn expansion_terms(query: &str, outcomes: &BTreeMap<String, ToolOutcome>) -> Vec<String> {
        let in_query: HashSet<String> = words(query).collect();

        let mut successful: Vec<&ToolOutcome> =
            outcomes.values().filter(|o| o.is_success()).collect();
        successful.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for record in successful.iter().flat_map(|o| o.records.iter()) {
            let text = match &record.title {
                Some(title) => format!("{} {}", title, record.content),
                None => record.content.clone(),
            };
            for term in key_terms(&text) {
                if terms.len() >= MAX_EXPANSION_TERMS {
                    return terms;
                }
                if term.chars().all(|c| c.is_ascii_digit()) || in_query.contains(&term) {
                    continue;
                }
                if seen.insert(term.clone()) {
                    terms.push(term);
                }
            }
        }
        terms
    }
}

impl QualityAssessor for HeuristicAssessor {
    fn score(&self, query: &str, outcomes: &BTreeMap<String, ToolOutcome>) -> f64 {
        if outcomes.is_empty() {
            return 0.0;
        }

        let successful = outcomes.values().filter(|o| o.is_success()).count();
        let success_ratio = successful as f64 / outcomes.len() as f64;
        let confidence = self.estimate_confidence(query, outcomes);

        let terms = key_terms(query);
        let coverage = match Self::returned_text(outcomes) {
            Some(text) if !terms.is_empty() => {
                terms.iter().filter(|t| text.contains(t.as_str())).count() as f64
                    / terms.len() as f64
            }
            _ => 0.0,
        };

        (SUCCESS_WEIGHT * success_ratio
            + CONFIDENCE_WEIGHT * confidence
            + COVERAGE_WEIGHT * coverage)
            .clamp(0.0, 1.0)
    }

    fn identify_missing(
        &self,
        query: &str,
        outcomes: &BTreeMap<String, ToolOutcome>,
    ) -> Vec<String> {
        let in_query: HashSet<String> = words(query).collect();
        let hints = COVERAGE_HINTS
            .iter()
            .map(|h| h.to_string())
            .filter(|h| !in_query.contains(h));

        let Some(text) = Self::returned_text(outcomes) else {
            return hints.collect();
        };

        let mut missing = Self::expansion_terms(query, outcomes);
        let uncovered = key_terms(query)
            .iter()
            .any(|t| !text.contains(t.as_str()));
        if uncovered {
            let extra: Vec<String> = hints.filter(|h| !missing.contains(h)).collect();
            missing.extend(extra);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_domain::{RefinementLimits, ResultRecord, ToolError, refine_query};

    fn batch(outcomes: Vec<ToolOutcome>) -> BTreeMap<String, ToolOutcome> {
        outcomes
            .into_iter()
            .map(|o| (o.tool_name.clone(), o))
            .collect()
    }

    #[test]
    fn test_key_terms() {
        assert_eq!(
            key_terms("Why is my EC2 instance so slow? EC2!"),
            vec!["ec2", "instance", "slow"]
        );
    }

    #[test]
    fn test_empty_batch_scores_zero() {
        let assessor = HeuristicAssessor::new();
        assert_eq!(assessor.score("ec2 slow", &BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_full_quality_batch() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![
            ToolOutcome::success("kb", vec![ResultRecord::new("EC2 instance runs slow")])
                .with_confidence(1.0),
        ]);
        assert!((assessor.score("ec2 instance slow", &outcomes) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_batch() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![
            ToolOutcome::success("kb", vec![ResultRecord::new("EC2 instance types")])
                .with_confidence(0.5),
            ToolOutcome::failure("web", ToolError::execution_failed("offline")),
        ]);
        // 0.4 * 0.5 + 0.4 * 0.5 + 0.2 * (2/3)
        let expected = 0.2 + 0.2 + 0.2 * (2.0 / 3.0);
        assert!((assessor.score("ec2 instance slow", &outcomes) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_terms_come_from_records_not_query() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![
            ToolOutcome::success("kb", vec![ResultRecord::new("EC2 pricing overview")])
                .with_confidence(0.5),
        ]);
        assert_eq!(
            assessor.identify_missing("EC2 instance slow", &outcomes),
            vec!["pricing", "overview", "documentation", "troubleshooting"]
        );
    }

    #[test]
    fn test_fully_covered_query_gets_only_record_terms() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![
            ToolOutcome::success(
                "kb",
                vec![ResultRecord::new("EC2 instance slow: check CPU credits and 2024 EBS burst")],
            )
            .with_confidence(0.9),
        ]);
        assert_eq!(
            assessor.identify_missing("ec2 instance slow", &outcomes),
            vec!["check", "cpu", "credits"]
        );
    }

    #[test]
    fn test_most_confident_records_lead() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![
            ToolOutcome::success("a_low", vec![ResultRecord::new("billing alarms")])
                .with_confidence(0.2),
            ToolOutcome::success("b_high", vec![ResultRecord::new("throttling limits")])
                .with_confidence(0.9),
        ]);
        let missing = assessor.identify_missing("lambda throttling", &outcomes);
        assert_eq!(&missing[..3], &["limits", "billing", "alarms"]);
    }

    #[test]
    fn test_refinement_changes_query_each_pass() {
        let assessor = HeuristicAssessor::new();
        let limits = RefinementLimits::default();
        let outcomes = batch(vec![
            ToolOutcome::success("kb", vec![ResultRecord::new("EC2 pricing overview")])
                .with_confidence(0.5),
        ]);

        let query = "EC2 instance slow";
        let missing = assessor.identify_missing(query, &outcomes);
        let refined = refine_query(query, &missing, limits);
        assert_ne!(refined, query);
        assert!(refined.starts_with(query));
        assert!(refined.contains("pricing"));

        // Suggestions never repeat what the refined query already holds
        let again = assessor.identify_missing(&refined, &outcomes);
        assert!(again.iter().all(|t| !refined.to_lowercase().contains(t.as_str())));
    }

    #[test]
    fn test_no_records_returns_hints() {
        let assessor = HeuristicAssessor::new();
        let outcomes = batch(vec![ToolOutcome::failure(
            "web",
            ToolError::execution_failed("offline"),
        )]);
        assert_eq!(
            assessor.identify_missing("ec2 slow", &outcomes),
            vec!["documentation", "troubleshooting"]
        );
    }
}
