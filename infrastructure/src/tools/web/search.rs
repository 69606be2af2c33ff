//! `web_search` tool: search the web using the DuckDuckGo Instant Answer API.
//!
//! # DuckDuckGo Instant Answer API
//!
//! Uses the [DuckDuckGo Instant Answer API](https://api.duckduckgo.com/) which:
//! - Requires **no API key**
//! - Returns instant answers, abstracts, definitions, and related topics
//! - Does not return full web search result listings
//!
//! Each populated section becomes one [`ResultRecord`]: the abstract, the
//! instant answer, the definition and up to ten related topics. Records are
//! scored by word overlap with the query and the best five are kept.

use async_trait::async_trait;
use rag_domain::core::text::word_set;
use rag_domain::{QueryContext, ResultRecord, Tool, ToolError, ToolOutcome};
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::debug;

/// Canonical tool name for the web search tool.
pub const WEB_SEARCH: &str = "web_search";

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

const MIN_QUERY_CHARS: usize = 3;
const MAX_RELATED_TOPICS: usize = 10;
const MAX_RESULTS: usize = 5;
const MAX_CONTENT_CHARS: usize = 500;

/// Documentation hosts whose records raise confidence
const OFFICIAL_DOMAINS: &[&str] = &[
    "docs.aws.amazon.com",
    "docs.microsoft.com",
    "learn.microsoft.com",
    "cloud.google.com",
];

pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
}

impl WebSearchTool {
    /// Create with a request timeout
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint: DDG_API_URL.to_string(),
        })
    }

    /// Point the tool at another Instant-Answer-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH
    }

    fn description(&self) -> &str {
        "Search the web for real-time cloud service information and documentation"
    }

    fn category(&self) -> &str {
        "search"
    }

    fn validate(&self, query: &str, context: &QueryContext) -> bool {
        query.trim().chars().count() >= MIN_QUERY_CHARS
            && context.preference_flag("web_search_enabled", true)
    }

    async fn execute(&self, query: &str, _context: &QueryContext) -> Result<ToolOutcome, ToolError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .header("User-Agent", "AgenticRag/0.4 (Retrieval Tool)")
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to parse search results: {}", e))
        })?;

        let records = rank_records(query, parse_instant_answer(&body));
        debug!(tool = WEB_SEARCH, records = records.len(), "Web search finished");

        let confidence = search_confidence(&records);
        let sources = records.iter().filter_map(|r| r.url.clone()).collect();

        Ok(ToolOutcome::success(WEB_SEARCH, records)
            .with_sources(sources)
            .with_confidence(confidence)
            .with_latency(start.elapsed()))
    }
}

fn non_empty<'a>(data: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    data[key].as_str().filter(|s| !s.trim().is_empty())
}

fn clean_content(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() > MAX_CONTENT_CHARS {
        let cut: String = text.chars().take(MAX_CONTENT_CHARS).collect();
        format!("{}...", cut)
    } else {
        text
    }
}

/// Extract unscored records from a DuckDuckGo API response.
///
/// Nested topic groups in `RelatedTopics` are skipped.
fn parse_instant_answer(data: &serde_json::Value) -> Vec<ResultRecord> {
    let mut records = Vec::new();

    if let Some(text) = non_empty(data, "AbstractText") {
        let title = non_empty(data, "Heading")
            .or_else(|| non_empty(data, "AbstractSource"))
            .unwrap_or("Summary");
        let mut record = ResultRecord::new(clean_content(text)).with_title(title);
        if let Some(url) = non_empty(data, "AbstractURL") {
            record = record.with_url(url);
        }
        records.push(record);
    }

    if let Some(answer) = non_empty(data, "Answer") {
        records.push(ResultRecord::new(clean_content(answer)).with_title("Instant Answer"));
    }

    if let Some(definition) = non_empty(data, "Definition") {
        let mut record = ResultRecord::new(clean_content(definition)).with_title("Definition");
        if let Some(url) = non_empty(data, "DefinitionURL") {
            record = record.with_url(url);
        }
        records.push(record);
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        for topic in topics
            .iter()
            .filter(|t| non_empty(t, "Text").is_some())
            .take(MAX_RELATED_TOPICS)
        {
            let text = non_empty(topic, "Text").unwrap_or_default();
            let mut record = ResultRecord::new(clean_content(text)).with_title("Related Topic");
            if let Some(url) = non_empty(topic, "FirstURL") {
                record = record.with_url(url);
            }
            records.push(record);
        }
    }

    records
}

/// Score records by query overlap and keep the best ones.
fn rank_records(query: &str, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let query_words = word_set(query);
    let mut scored: Vec<ResultRecord> = records
        .into_iter()
        .map(|record| {
            let score = overlap_score(&query_words, &record);
            record.with_score(score)
        })
        .collect();

    scored.sort_by(|a, b| {
        let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    scored.truncate(MAX_RESULTS);
    scored
}

fn overlap_score(query_words: &std::collections::HashSet<String>, record: &ResultRecord) -> f64 {
    if query_words.is_empty() {
        return 0.0;
    }
    let overlap = |text: &str| {
        query_words.intersection(&word_set(text)).count() as f64 / query_words.len() as f64
    };
    let title = record.title.as_deref().map_or(0.0, overlap);
    let official = if is_official(record) { 0.2 } else { 0.0 };
    (0.4 * title + 0.4 * overlap(&record.content) + official).min(1.0)
}

fn is_official(record: &ResultRecord) -> bool {
    record
        .url
        .as_deref()
        .is_some_and(|url| OFFICIAL_DOMAINS.iter().any(|d| url.contains(d)))
}

/// Mean record score, boosted for official documentation and result count.
fn search_confidence(records: &[ResultRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let mean = records.iter().filter_map(|r| r.score).sum::<f64>() / records.len() as f64;
    let official = records.iter().filter(|r| is_official(r)).count();
    let official_boost = (official as f64 * 0.1).min(0.3);
    let count_boost = (records.len() as f64 * 0.04).min(0.2);
    (mean + official_boost + count_boost).min(0.95)
}
