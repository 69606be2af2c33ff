//! `knowledge_base` tool: keyword search over curated cloud documentation.
//!
//! Entries are scored by word overlap with the query:
//!
//! | Field | Weight |
//! |-------|--------|
//! | title | 0.4 |
//! | content | 0.4 |
//! | tags | 0.2 |
//!
//! Each overlap is the share of query words found in that field. Entries
//! from the user's `preferred_cloud_provider` get a flat boost.

use async_trait::async_trait;
use rag_domain::core::text::word_set;
use rag_domain::{QueryContext, ResultRecord, Tool, ToolError, ToolOutcome};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Canonical tool name.
pub const KNOWLEDGE_BASE: &str = "knowledge_base";

const TITLE_WEIGHT: f64 = 0.4;
const CONTENT_WEIGHT: f64 = 0.4;
const TAG_WEIGHT: f64 = 0.2;

/// Entries at or below this similarity are dropped
const MIN_SIMILARITY: f64 = 0.1;
const PREFERRED_PROVIDER_BOOST: f64 = 0.2;
const MAX_RESULTS: usize = 5;

/// The tool only handles queries mentioning one of these
const CLOUD_KEYWORDS: &[&str] = &[
    "aws", "azure", "cloud", "ec2", "s3", "lambda", "vm", "storage", "compute",
];

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("Failed to read knowledge base {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid knowledge base {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One curated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub service: String,
    pub provider: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl KnowledgeEntry {
    /// Weighted word overlap with the query words, in [0, 1]
    fn similarity(&self, query_words: &HashSet<String>) -> f64 {
        if query_words.is_empty() {
            return 0.0;
        }
        let overlap = |words: &HashSet<String>| {
            query_words.intersection(words).count() as f64 / query_words.len() as f64
        };
        let tags: HashSet<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();

        TITLE_WEIGHT * overlap(&word_set(&self.title))
            + CONTENT_WEIGHT * overlap(&word_set(&self.content))
            + TAG_WEIGHT * overlap(&tags)
    }

    fn to_record(&self, score: f64) -> ResultRecord {
        let record = ResultRecord::new(&self.content)
            .with_title(&self.title)
            .with_score(score);
        match &self.url {
            Some(url) => record.with_url(url),
            None => record,
        }
    }
}

/// A scored hit from [`KnowledgeBaseTool::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeHit<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: f64,
}

pub struct KnowledgeBaseTool {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBaseTool {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Tool preloaded with a handful of AWS and Azure entries
    pub fn seeded() -> Self {
        Self::new(seed_entries())
    }

    /// Load entries from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<KnowledgeEntry> =
            serde_json::from_str(&text).map_err(|source| KnowledgeBaseError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "Loaded {} knowledge base entries from {}",
            entries.len(),
            path.display()
        );
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top hits for `query`, best first.
    pub fn search(&self, query: &str, preferred_provider: Option<&str>) -> Vec<KnowledgeHit<'_>> {
        let query_words = word_set(query);
        let mut hits: Vec<KnowledgeHit<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let similarity = entry.similarity(&query_words);
                if similarity <= MIN_SIMILARITY {
                    return None;
                }
                let boost = match preferred_provider {
                    Some(provider) if entry.provider.eq_ignore_ascii_case(provider) => {
                        PREFERRED_PROVIDER_BOOST
                    }
                    _ => 0.0,
                };
                Some(KnowledgeHit {
                    entry,
                    score: similarity + boost,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(MAX_RESULTS);
        hits
    }

    /// Confidence from the top score, rewarding corroborating hits.
    pub fn confidence(hits: &[KnowledgeHit<'_>]) -> f64 {
        let Some(top) = hits.first() else {
            return 0.0;
        };
        match hits.len() {
            n if n >= 3 => (top.score + 0.2).min(0.9),
            2 => (top.score + 0.1).min(0.8),
            _ => top.score.min(0.7),
        }
    }
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        KNOWLEDGE_BASE
    }

    fn description(&self) -> &str {
        "Search cloud services knowledge base for documentation on AWS and Azure services"
    }

    fn category(&self) -> &str {
        "search"
    }

    fn validate(&self, query: &str, _context: &QueryContext) -> bool {
        let query = query.trim().to_lowercase();
        !query.is_empty() && CLOUD_KEYWORDS.iter().any(|k| query.contains(k))
    }

    async fn execute(&self, query: &str, context: &QueryContext) -> Result<ToolOutcome, ToolError> {
        let start = Instant::now();
        let hits = self.search(query, context.preference_str("preferred_cloud_provider"));
        debug!(tool = KNOWLEDGE_BASE, hits = hits.len(), "Knowledge base search");

        let confidence = Self::confidence(&hits);
        let sources = hits.iter().filter_map(|h| h.entry.url.clone()).collect();
        let records = hits.iter().map(|h| h.entry.to_record(h.score)).collect();

        Ok(ToolOutcome::success(KNOWLEDGE_BASE, records)
            .with_sources(sources)
            .with_confidence(confidence)
            .with_latency(start.elapsed()))
    }
}

fn entry(
    id: &str,
    title: &str,
    content: &str,
    (service, provider, category): (&str, &str, &str),
    tags: &[&str],
    url: &str,
) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        service: service.to_string(),
        provider: provider.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        url: Some(url.to_string()),
    }
}

fn seed_entries() -> Vec<KnowledgeEntry> {
    vec![
        entry(
            "aws_ec2_1",
            "AWS EC2 Instance Types",
            "Amazon EC2 provides various instance types optimized for different use cases. \
             General Purpose instances (t3, m5) provide balanced compute, memory, and networking. \
             Compute Optimized instances (c5) are ideal for CPU-intensive applications.",
            ("ec2", "aws", "compute"),
            &["instance", "types", "compute", "cpu", "memory"],
            "https://docs.aws.amazon.com/ec2/instance-types/",
        ),
        entry(
            "aws_s3_1",
            "AWS S3 Storage Classes",
            "Amazon S3 offers different storage classes for different use cases: Standard for \
             frequently accessed data, Infrequent Access for less frequently accessed data, and \
             Glacier for archival storage.",
            ("s3", "aws", "storage"),
            &["storage", "classes", "archival", "glacier"],
            "https://docs.aws.amazon.com/s3/storage-classes/",
        ),
        entry(
            "azure_vm_1",
            "Azure Virtual Machine Sizes",
            "Azure Virtual Machines come in various sizes and series. B-series for burstable \
             workloads, D-series for general purpose computing, and F-series for \
             compute-intensive workloads.",
            ("virtual-machines", "azure", "compute"),
            &["vm", "sizes", "series", "burstable", "compute"],
            "https://docs.microsoft.com/azure/virtual-machines/sizes",
        ),
        entry(
            "aws_lambda_1",
            "AWS Lambda Function Configuration",
            "AWS Lambda functions can be configured with memory from 128MB to 10GB. CPU power \
             scales linearly with memory allocation. Timeout can be set up to 15 minutes for \
             Lambda functions.",
            ("lambda", "aws", "serverless"),
            &["lambda", "memory", "timeout", "configuration"],
            "https://docs.aws.amazon.com/lambda/configuration/",
        ),
        entry(
            "azure_functions_1",
            "Azure Functions Scaling",
            "Azure Functions automatically scale based on demand. Consumption plan provides \
             automatic scaling, while Premium plan offers pre-warmed instances and VNet \
             connectivity.",
            ("functions", "azure", "serverless"),
            &["functions", "scaling", "consumption", "premium"],
            "https://docs.microsoft.com/azure/azure-functions/functions-scale",
        ),
    ]
}
