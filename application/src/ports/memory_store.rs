//! Session and user-preference persistence port

use super::error::CollaboratorError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rag_domain::{AgentResponse, Preferences, QueryContext, Turn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One completed exchange, as handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub query: String,
    pub response: String,
    pub confidence: f64,
    /// Success flag per tool in the final batch
    pub tool_success: BTreeMap<String, bool>,
    #[serde(with = "rag_domain::core::duration_ms", rename = "latency_ms")]
    pub latency: Duration,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    pub fn from_response(context: &QueryContext, response: &AgentResponse) -> Self {
        Self {
            query: context.query.clone(),
            response: response.content.clone(),
            confidence: response.confidence,
            tool_success: response
                .tool_outcomes
                .iter()
                .map(|(name, outcome)| (name.clone(), outcome.is_success()))
                .collect(),
            latency: response.latency,
            timestamp: Utc::now(),
        }
    }

    /// History entry for this interaction
    pub fn to_turn(&self) -> Turn {
        Turn {
            query: self.query.clone(),
            response: self.response.clone(),
            confidence: self.confidence,
            timestamp: self.timestamp,
        }
    }
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Prior turns of a thread, most recent last
    async fn get_session_history(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<Vec<Turn>, CollaboratorError>;

    async fn get_user_preferences(&self, user_id: &str) -> Result<Preferences, CollaboratorError>;

    async fn store_interaction(
        &self,
        user_id: &str,
        thread_id: &str,
        interaction: Interaction,
    ) -> Result<(), CollaboratorError>;

    /// Merge `updates` into the user's preferences
    async fn update_user_preferences(
        &self,
        user_id: &str,
        updates: Preferences,
    ) -> Result<(), CollaboratorError>;
}
