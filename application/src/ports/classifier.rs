//! Query classification port

use super::error::CollaboratorError;
use async_trait::async_trait;
use rag_domain::QueryType;

/// Classifier verdict for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub query_type: QueryType,
    /// How strongly the query belongs to the supported domain, in [0, 1]
    pub domain_relevance: f64,
    /// Confidence of the classification, in [0, 1]
    pub confidence: f64,
}

/// Assigns a query type and relevance scores to English query text.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, CollaboratorError>;
}
