//! Pure scoring functions behind the selection strategies.
//!
//! All rankings are stable: tools with equal scores keep the order in which
//! they were supplied (registration order for the registry).

use crate::core::text::word_set;
use crate::query::query_type::QueryType;
use crate::tool::performance::PerformanceRecord;
use std::cmp::Ordering;

pub const PERFORMANCE_SUCCESS_WEIGHT: f64 = 0.5;
pub const PERFORMANCE_LATENCY_WEIGHT: f64 = 0.3;
pub const PERFORMANCE_USAGE_WEIGHT: f64 = 0.2;
/// Call count at which the usage component saturates
pub const USAGE_SATURATION: f64 = 10.0;

pub const HYBRID_PERFORMANCE_WEIGHT: f64 = 0.4;
pub const HYBRID_CATEGORY_WEIGHT: f64 = 0.4;
pub const HYBRID_RELEVANCE_WEIGHT: f64 = 0.2;

/// Performance score of a tool from its ledger record.
///
/// `0.5·successRate + 0.3·1/(1+meanLatencySecs) + 0.2·min(1, calls/10)`
pub fn performance_score(record: &PerformanceRecord) -> f64 {
    let latency = record.mean_latency_secs().max(0.0);
    let usage = (record.total_calls() as f64 / USAGE_SATURATION).min(1.0);

    record.success_rate() * PERFORMANCE_SUCCESS_WEIGHT
        + (1.0 / (1.0 + latency)) * PERFORMANCE_LATENCY_WEIGHT
        + usage * PERFORMANCE_USAGE_WEIGHT
}

/// Fraction of the query's words that also appear in `description`.
///
/// 0.0 when the query has no words.
pub fn relevance_score(query: &str, description: &str) -> f64 {
    let query_words = word_set(query);
    if query_words.is_empty() {
        return 0.0;
    }
    let description_words = word_set(description);
    let common = query_words.intersection(&description_words).count();
    common as f64 / query_words.len() as f64
}

/// Ordered tool categories relevant to a query type.
pub fn categories_for(query_type: QueryType) -> &'static [&'static str] {
    match query_type {
        QueryType::Troubleshooting => &["search", "analysis", "diagnostic"],
        QueryType::Comparison => &["search", "analysis", "comparison"],
        QueryType::Configuration => &["search", "documentation", "tutorial"],
        QueryType::Performance => &["search", "analysis", "monitoring"],
        _ => &["search", "general"],
    }
}

/// Sort `(name, score)` pairs by score descending and keep the top `limit`
/// names. Equal scores keep their input order.
pub fn rank_descending(mut scored: Vec<(String, f64)>, limit: usize) -> Vec<String> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().take(limit).map(|(name, _)| name).collect()
}

/// Combine several rankings into one by positional weighting.
///
/// A tool at position `i` of a ranking with weight `w` contributes
/// `w·(max_tools − i)/max_tools`. Totals are ranked descending; ties keep
/// first-seen order across the rankings as supplied.
pub fn combine_hybrid(rankings: &[(f64, &[String])], max_tools: usize) -> Vec<String> {
    if max_tools == 0 {
        return Vec::new();
    }

    let mut totals: Vec<(String, f64)> = Vec::new();
    for (weight, ranking) in rankings {
        for (i, name) in ranking.iter().take(max_tools).enumerate() {
            let contribution = weight * (max_tools - i) as f64 / max_tools as f64;
            match totals.iter_mut().find(|(n, _)| n == name) {
                Some((_, total)) => *total += contribution,
                None => totals.push((name.clone(), contribution)),
            }
        }
    }

    rank_descending(totals, max_tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_performance_score_zeroed_record() {
        // No calls: success 0, latency term 1/(1+0), usage 0
        let score = performance_score(&PerformanceRecord::new());
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_performance_score_saturates_usage() {
        let mut record = PerformanceRecord::new();
        for _ in 0..20 {
            record.record(true, Duration::from_secs(1), None);
        }
        // 0.5·1 + 0.3·0.5 + 0.2·1
        assert!((performance_score(&record) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_relevance_score() {
        let score = relevance_score("EC2 instance slow", "Diagnose slow EC2 workloads");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(relevance_score("   ", "anything"), 0.0);
        assert_eq!(relevance_score("pricing", "web search"), 0.0);
    }

    #[test]
    fn test_categories_table() {
        assert_eq!(
            categories_for(QueryType::Performance),
            &["search", "analysis", "monitoring"]
        );
        assert_eq!(categories_for(QueryType::Pricing), &["search", "general"]);
        assert_eq!(categories_for(QueryType::General), &["search", "general"]);
    }

    #[test]
    fn test_rank_descending_is_stable() {
        let scored = vec![
            ("a".to_string(), 0.5),
            ("b".to_string(), 0.9),
            ("c".to_string(), 0.5),
            ("d".to_string(), 0.1),
        ];
        assert_eq!(rank_descending(scored, 3), names(&["b", "a", "c"]));
    }

    #[test]
    fn test_combine_hybrid_weights_positions() {
        let perf = names(&["search", "perf", "diag"]);
        let category = names(&["search", "perf"]);
        let relevance = names(&["diag", "search", "perf"]);

        let ranked = combine_hybrid(
            &[
                (HYBRID_PERFORMANCE_WEIGHT, &perf),
                (HYBRID_CATEGORY_WEIGHT, &category),
                (HYBRID_RELEVANCE_WEIGHT, &relevance),
            ],
            3,
        );

        // search: 0.4 + 0.4 + 0.2·2/3; perf: 0.4·2/3 + 0.4·2/3 + 0.2/3; diag: 0.4/3 + 0.2
        assert_eq!(ranked, names(&["search", "perf", "diag"]));
    }

    #[test]
    fn test_combine_hybrid_tie_keeps_first_seen() {
        let first = names(&["x"]);
        let second = names(&["y"]);
        let ranked = combine_hybrid(&[(0.4, &first), (0.4, &second)], 2);
        assert_eq!(ranked, names(&["x", "y"]));
    }

    #[test]
    fn test_combine_hybrid_zero_max() {
        let list = names(&["x"]);
        assert!(combine_hybrid(&[(0.4, &list)], 0).is_empty());
    }
}
