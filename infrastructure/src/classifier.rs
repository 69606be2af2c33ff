//! Keyword-based query classifier.
//!
//! Scores cloud-domain relevance and picks a [`QueryType`] by counting
//! substring hits against fixed vocabularies. No model is involved, so the
//! result is deterministic for a given text.

use async_trait::async_trait;
use rag_application::ports::classifier::{Classification, Classifier};
use rag_application::ports::error::CollaboratorError;
use rag_domain::QueryType;

const PROVIDER_TERMS: &[&str] = &[
    // aws
    "aws", "amazon web services", "amazon", "ec2", "s3", "lambda", "rds", "cloudfront",
    // azure
    "azure", "microsoft azure", "microsoft", "vm", "blob storage", "functions", "sql database",
    // gcp
    "gcp", "google cloud", "google", "compute engine", "cloud storage", "cloud functions",
    // alibaba
    "alibaba cloud", "aliyun", "ecs", "oss",
    // oracle
    "oracle cloud", "oci", "oracle",
    // ibm
    "ibm cloud", "watson", "bluemix",
];

const SERVICE_TERMS: &[&str] = &[
    // compute
    "ec2", "virtual machine", "vm", "instance", "server", "compute engine", "container",
    "kubernetes", "docker", "ecs", "aks", "gke", "fargate",
    // storage
    "s3", "blob storage", "cloud storage", "bucket", "object storage", "file storage",
    "block storage", "disk", "volume", "backup",
    // database
    "rds", "sql database", "nosql", "dynamodb", "cosmos db", "firestore", "mysql",
    "postgresql", "mongodb", "redis", "database",
    // networking
    "vpc", "vnet", "subnet", "load balancer", "cdn", "cloudfront", "firewall",
    "security group", "route", "gateway", "dns",
    // security
    "iam", "active directory", "authentication", "authorization", "encryption", "ssl",
    "certificate", "key vault", "secrets",
    // monitoring
    "cloudwatch", "azure monitor", "stackdriver", "logging", "metrics", "alerts",
    "monitoring", "observability",
    // serverless
    "lambda", "azure functions", "cloud functions", "serverless", "api gateway", "event",
    "trigger",
];

const CLOUD_KEYWORDS: &[&str] = &["cloud", "saas", "paas", "iaas", "devops", "api", "microservice"];

const NON_CLOUD_TERMS: &[&str] = &[
    "local", "on-premise", "desktop", "mobile app", "game", "recipe", "weather", "news",
    "sports", "entertainment", "personal",
];

const SPECIFIC_SERVICES: &[&str] = &["ec2", "s3", "lambda", "rds", "azure vm", "blob storage"];

const VAGUE_TERMS: &[&str] = &["help", "question", "general", "basic", "simple"];

/// Pattern families, in tie-break order.
const TYPE_PATTERNS: &[(QueryType, &[&str])] = &[
    (
        QueryType::Troubleshooting,
        &[
            "error", "issue", "problem", "not working", "failed", "broken", "troubleshoot",
            "debug", "fix", "resolve", "help", "stuck",
        ],
    ),
    (
        QueryType::Comparison,
        &[
            "vs", "versus", "compare", "comparison", "difference", "better", "which", "choose",
            "select", "recommend", "best",
        ],
    ),
    (
        QueryType::Configuration,
        &[
            "configure", "setup", "install", "deploy", "create", "build", "how to",
            "step by step", "guide", "tutorial",
        ],
    ),
    (
        QueryType::Performance,
        &[
            "performance", "slow", "fast", "optimize", "speed", "latency", "throughput",
            "bottleneck", "scale", "scaling",
        ],
    ),
    (
        QueryType::Pricing,
        &[
            "cost", "price", "pricing", "billing", "charge", "expensive", "cheap", "budget",
            "estimate", "calculator",
        ],
    ),
    (
        QueryType::Security,
        &[
            "security", "secure", "vulnerability", "compliance", "audit", "permission",
            "access", "policy", "encryption",
        ],
    ),
    (
        QueryType::Migration,
        &[
            "migrate", "migration", "move", "transfer", "import", "export", "backup", "restore",
            "sync", "replicate",
        ],
    ),
];

const PROVIDER_WEIGHT: f64 = 0.3;
const SERVICE_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.2;
const PENALTY_WEIGHT: f64 = 0.1;
const CONFIDENCE_STEP: f64 = 0.1;

fn hits(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| text.contains(*term)).count()
}

fn saturating(weight: f64, matches: usize, saturation: f64) -> f64 {
    weight * (matches as f64 / saturation).min(1.0)
}

/// Cloud-domain classifier driven by keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Domain relevance in [0, 1]
    pub fn relevance(&self, text: &str) -> f64 {
        let text = text.to_lowercase();
        let score = saturating(PROVIDER_WEIGHT, hits(&text, PROVIDER_TERMS), 3.0)
            + saturating(SERVICE_WEIGHT, hits(&text, SERVICE_TERMS), 5.0)
            + saturating(KEYWORD_WEIGHT, hits(&text, CLOUD_KEYWORDS), 3.0)
            - saturating(PENALTY_WEIGHT, hits(&text, NON_CLOUD_TERMS), 2.0);
        score.clamp(0.0, 1.0)
    }

    /// Pattern family with the most hits; the earlier family wins ties.
    pub fn query_type(&self, text: &str) -> QueryType {
        let text = text.to_lowercase();
        let mut best = (QueryType::General, 0);
        for (query_type, patterns) in TYPE_PATTERNS {
            let count = hits(&text, patterns);
            if count > best.1 {
                best = (*query_type, count);
            }
        }
        best.0
    }

    fn confidence(&self, text: &str, relevance: f64) -> f64 {
        let text = text.to_lowercase();
        let boost = hits(&text, SPECIFIC_SERVICES) as f64 * CONFIDENCE_STEP;
        let penalty = hits(&text, VAGUE_TERMS) as f64 * CONFIDENCE_STEP;
        (relevance + boost - penalty).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, CollaboratorError> {
        let domain_relevance = self.relevance(text);
        Ok(Classification {
            query_type: self.query_type(text),
            domain_relevance,
            confidence: self.confidence(text, domain_relevance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_query_is_relevant() {
        let classifier = KeywordClassifier::new();
        // providers: aws, ec2 -> 2/3; services: ec2, instance -> 2/5
        let relevance = classifier.relevance("My AWS EC2 instance is slow");
        let expected = 0.3 * (2.0 / 3.0) + 0.4 * (2.0 / 5.0);
        assert!((relevance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_non_cloud_query_scores_zero() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.relevance("best pasta recipe for tonight"), 0.0);
    }

    #[test]
    fn test_relevance_is_clamped() {
        let classifier = KeywordClassifier::new();
        let text = "aws amazon ec2 s3 lambda rds instance server bucket database cloud api devops saas";
        assert_eq!(classifier.relevance(text), 1.0);
    }

    #[test]
    fn test_query_type_detection() {
        let classifier = KeywordClassifier::new();
        assert_eq!(
            classifier.query_type("Lambda error: function failed"),
            QueryType::Troubleshooting
        );
        assert_eq!(
            classifier.query_type("Compare S3 versus Blob Storage"),
            QueryType::Comparison
        );
        assert_eq!(
            classifier.query_type("How to setup a VPC"),
            QueryType::Configuration
        );
        assert_eq!(classifier.query_type("S3 pricing"), QueryType::Pricing);
        assert_eq!(classifier.query_type("tell me about s3"), QueryType::General);
    }

    #[test]
    fn test_ties_prefer_earlier_family() {
        let classifier = KeywordClassifier::new();
        // one troubleshooting hit ("error"), one performance hit ("slow")
        assert_eq!(
            classifier.query_type("error when ec2 is slow"),
            QueryType::Troubleshooting
        );
    }

    #[tokio::test]
    async fn test_confidence_adjustments() {
        let classifier = KeywordClassifier::new();
        let specific = classifier.classify("ec2 instance").await.unwrap();
        assert!(specific.confidence > specific.domain_relevance);

        let vague = classifier.classify("basic help with azure").await.unwrap();
        assert!(vague.confidence < vague.domain_relevance);
        assert!(vague.confidence >= 0.0);
    }
}
