//! In-process memory store.
//!
//! Keeps per-thread session history and per-user preferences for the
//! lifetime of the process.

use async_trait::async_trait;
use rag_application::ports::error::CollaboratorError;
use rag_application::ports::memory_store::{Interaction, MemoryStore};
use rag_domain::{Preferences, Turn};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

/// Turns kept per `(user, thread)`; older turns are evicted first.
pub const MAX_SESSION_HISTORY: usize = 50;

/// Preferences every user starts from.
pub fn default_preferences() -> Preferences {
    let mut preferences = Preferences::new();
    preferences.insert("language".into(), Value::from("en"));
    preferences.insert("web_search_enabled".into(), Value::Bool(true));
    preferences.insert("detailed_responses".into(), Value::Bool(false));
    preferences.insert("preferred_cloud_provider".into(), Value::from("aws"));
    preferences.insert("response_style".into(), Value::from("professional"));
    preferences
}

pub struct InMemoryStore {
    sessions: RwLock<HashMap<(String, String), VecDeque<Interaction>>>,
    preferences: RwLock<HashMap<String, Preferences>>,
    history_limit: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_history_limit(MAX_SESSION_HISTORY)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            preferences: RwLock::new(HashMap::new()),
            history_limit,
        }
    }

    /// Number of stored turns for a thread
    pub async fn session_len(&self, user_id: &str, thread_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(&(user_id.to_string(), thread_id.to_string()))
            .map_or(0, VecDeque::len)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get_session_history(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<Vec<Turn>, CollaboratorError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&(user_id.to_string(), thread_id.to_string()))
            .map(|turns| turns.iter().map(Interaction::to_turn).collect())
            .unwrap_or_default())
    }

    async fn get_user_preferences(&self, user_id: &str) -> Result<Preferences, CollaboratorError> {
        let preferences = self.preferences.read().await;
        Ok(preferences
            .get(user_id)
            .cloned()
            .unwrap_or_else(default_preferences))
    }

    async fn store_interaction(
        &self,
        user_id: &str,
        thread_id: &str,
        interaction: Interaction,
    ) -> Result<(), CollaboratorError> {
        let mut sessions = self.sessions.write().await;
        let turns = sessions
            .entry((user_id.to_string(), thread_id.to_string()))
            .or_default();
        turns.push_back(interaction);
        while turns.len() > self.history_limit {
            turns.pop_front();
        }
        debug!(user = %user_id, thread = %thread_id, turns = turns.len(), "Stored interaction");
        Ok(())
    }

    async fn update_user_preferences(
        &self,
        user_id: &str,
        updates: Preferences,
    ) -> Result<(), CollaboratorError> {
        let mut preferences = self.preferences.write().await;
        let current = preferences
            .entry(user_id.to_string())
            .or_insert_with(default_preferences);
        for (key, value) in updates {
            current.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn interaction(query: &str) -> Interaction {
        Interaction {
            query: query.to_string(),
            response: format!("answer to {}", query),
            confidence: 0.8,
            tool_success: BTreeMap::from([("knowledge_base".to_string(), true)]),
            latency: Duration::from_millis(40),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_history_is_per_thread_and_ordered() {
        let store = InMemoryStore::new();
        store.store_interaction("u", "t1", interaction("first")).await.unwrap();
        store.store_interaction("u", "t1", interaction("second")).await.unwrap();
        store.store_interaction("u", "t2", interaction("other")).await.unwrap();

        let history = store.get_session_history("u", "t1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "first");
        assert_eq!(history[1].query, "second");
        assert!(store.get_session_history("u", "t3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_evicts_oldest() {
        let store = InMemoryStore::new();
        for i in 0..MAX_SESSION_HISTORY + 5 {
            store
                .store_interaction("u", "t", interaction(&format!("q{}", i)))
                .await
                .unwrap();
        }

        let history = store.get_session_history("u", "t").await.unwrap();
        assert_eq!(history.len(), MAX_SESSION_HISTORY);
        assert_eq!(history[0].query, "q5");
        assert_eq!(store.session_len("u", "t").await, MAX_SESSION_HISTORY);
    }

    #[tokio::test]
    async fn test_default_preferences() {
        let store = InMemoryStore::new();
        let preferences = store.get_user_preferences("new-user").await.unwrap();
        assert_eq!(preferences["web_search_enabled"], Value::Bool(true));
        assert_eq!(preferences["detailed_responses"], Value::Bool(false));
        assert_eq!(preferences["preferred_cloud_provider"], "aws");
    }

    #[tokio::test]
    async fn test_updates_merge_into_defaults() {
        let store = InMemoryStore::new();
        let mut updates = Preferences::new();
        updates.insert("detailed_responses".into(), Value::Bool(true));
        store.update_user_preferences("u", updates).await.unwrap();

        let preferences = store.get_user_preferences("u").await.unwrap();
        assert_eq!(preferences["detailed_responses"], Value::Bool(true));
        assert_eq!(preferences["language"], "en");
    }
}
