//! Candidate content synthesis from a batch of outcomes.

use super::response::NO_RESULTS_TEXT;
use crate::query::query_type::QueryType;
use crate::tool::value_objects::{ResultRecord, ToolOutcome};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

/// Records rendered for most query types
pub const MAX_RENDERED_RECORDS: usize = 5;
/// Records rendered for comparisons
pub const MAX_COMPARED_RECORDS: usize = 3;

const BEST_PRACTICES: [&str; 3] = [
    "Always backup your configuration before making changes",
    "Test changes in a development environment first",
    "Monitor performance after configuration changes",
];

/// Candidate content and its supporting sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub content: String,
    pub sources: Vec<String>,
    /// Number of records taken from successful outcomes
    pub record_count: usize,
}

impl Synthesis {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Render candidate content for `query` from the successful outcomes.
///
/// Records are ranked by score descending; ties (and unscored records) keep
/// tool-name order, then the tool's own order. Sources are de-duplicated in
/// the same order. Failed outcomes contribute nothing, and an empty batch
/// yields the no-results text.
pub fn synthesize(
    query: &str,
    query_type: QueryType,
    outcomes: &BTreeMap<String, ToolOutcome>,
) -> Synthesis {
    let mut records: Vec<&ResultRecord> = Vec::new();
    let mut sources = Vec::new();
    let mut seen = HashSet::new();

    for outcome in outcomes.values().filter(|o| o.is_success()) {
        records.extend(outcome.records.iter());
        for source in &outcome.sources {
            if seen.insert(source.as_str()) {
                sources.push(source.clone());
            }
        }
    }

    records.sort_by(|a, b| {
        let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });

    let content = if records.is_empty() {
        NO_RESULTS_TEXT.to_string()
    } else {
        match query_type {
            QueryType::Troubleshooting => render_troubleshooting(query, &records),
            QueryType::Comparison => render_comparison(query, &records),
            QueryType::Configuration => render_configuration(query, &records),
            _ => render_general(query, &records),
        }
    };

    Synthesis {
        content,
        sources,
        record_count: records.len(),
    }
}

fn with_content<'a>(records: &'a [&'a ResultRecord]) -> impl Iterator<Item = &'a ResultRecord> {
    records
        .iter()
        .copied()
        .filter(|r| !r.content.trim().is_empty())
}

fn render_troubleshooting(query: &str, records: &[&ResultRecord]) -> String {
    let mut out = String::from("# Cloud Services Troubleshooting Guide\n");
    let _ = write!(out, "Based on your query: '{}'\n\n", query);

    out.push_str("## Troubleshooting Steps:\n");
    for (i, record) in with_content(records).take(MAX_RENDERED_RECORDS).enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, record.content);
    }

    let links: Vec<_> = records.iter().filter(|r| r.url.is_some()).collect();
    if !links.is_empty() {
        out.push_str("\n## Additional Resources:\n");
        for record in links {
            let title = record.title.as_deref().unwrap_or("Resource");
            let url = record.url.as_deref().unwrap_or_default();
            let _ = writeln!(out, "- [{}]({})", title, url);
        }
    }
    out
}

fn render_comparison(query: &str, records: &[&ResultRecord]) -> String {
    let mut out = String::from("# Cloud Services Comparison\n");
    let _ = write!(out, "Comparing services for: '{}'\n\n", query);

    out.push_str("## Service Comparison:\n");
    for record in with_content(records).take(MAX_COMPARED_RECORDS) {
        let title = record.title.as_deref().unwrap_or("Service");
        let _ = write!(out, "### {}\n{}\n\n", title, record.content);
    }
    out
}

fn render_configuration(query: &str, records: &[&ResultRecord]) -> String {
    let mut out = String::from("# Cloud Service Configuration Guide\n");
    let _ = write!(out, "Configuration steps for: '{}'\n\n", query);

    out.push_str("## Configuration Steps:\n");
    for (i, record) in with_content(records).take(MAX_RENDERED_RECORDS).enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, record.content);
    }

    out.push_str("\n## Best Practices:\n");
    for practice in BEST_PRACTICES {
        let _ = writeln!(out, "- {}", practice);
    }
    out
}

fn render_general(query: &str, records: &[&ResultRecord]) -> String {
    let mut out = String::from("# Cloud Services Information\n");
    let _ = write!(out, "Information about: '{}'\n\n", query);

    for record in with_content(records).take(MAX_RENDERED_RECORDS) {
        let _ = writeln!(out, "- {}", record.content);
    }
    out
}
