//! Tool registry: ownership, category index, selection and bookkeeping.
//!
//! The registry is the sole owner of registered tools. Every mutation goes
//! through its operations; callers never see the underlying maps.
//!
//! # Selection strategies
//!
//! | Strategy | Validation | Ranking |
//! |----------|------------|---------|
//! | Performance | before scoring | ledger score, stable descending |
//! | Category | while walking buckets | query-type table order |
//! | Relevance | before scoring | description overlap, stable descending |
//! | Hybrid | via the three above | position-weighted blend |

use super::ledger::PerformanceLedger;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use rag_domain::selection::scoring::{
    HYBRID_CATEGORY_WEIGHT, HYBRID_PERFORMANCE_WEIGHT, HYBRID_RELEVANCE_WEIGHT, categories_for,
    combine_hybrid, performance_score, rank_descending, relevance_score,
};
use rag_domain::{ErrorSample, QueryContext, SelectionStrategy, Tool, ToolError, ToolOutcome};
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Query used by [`ToolRegistry::health_check`]
pub const HEALTH_CHECK_QUERY: &str = "test";
/// Minimum calls before a tool is ranked among the best performers
pub const BEST_PERFORMER_MIN_CALLS: u64 = 5;
const STATS_TOP_N: usize = 5;

/// Errors reported by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool not found: {0}")]
    NotFound(String),
}

struct ToolEntry {
    tool: Arc<dyn Tool>,
    category: String,
    registered_at: DateTime<Utc>,
}

#[derive(Default)]
struct RegistryState {
    /// Registration order
    order: Vec<String>,
    tools: HashMap<String, ToolEntry>,
    /// Category → tool names, in registration order
    categories: BTreeMap<String, Vec<String>>,
}

impl RegistryState {
    fn unindex(&mut self, name: &str, category: &str) {
        if let Some(bucket) = self.categories.get_mut(category) {
            bucket.retain(|n| n != name);
            if bucket.is_empty() {
                self.categories.remove(category);
            }
        }
    }

    fn ordered(&self) -> Vec<(String, Arc<dyn Tool>)> {
        self.order
            .iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|entry| (name.clone(), Arc::clone(&entry.tool)))
            })
            .collect()
    }

    fn bucket(&self, category: &str) -> Vec<(String, Arc<dyn Tool>)> {
        self.categories
            .get(category)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| {
                        self.tools
                            .get(name)
                            .map(|entry| (name.clone(), Arc::clone(&entry.tool)))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Registration metadata plus the current performance projection
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub category: String,
    pub registered_at: DateTime<Utc>,
    pub usage_count: u64,
    pub successful_calls: u64,
    pub success_rate: f64,
    pub mean_latency_secs: f64,
    pub last_used: Option<DateTime<Utc>>,
    pub recent_errors: Vec<ErrorSample>,
}

/// Compact per-tool line in [`RegistryStats`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub usage_count: u64,
    pub success_rate: f64,
    pub mean_latency_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub total_categories: usize,
    pub total_calls: u64,
    pub overall_success_rate: f64,
    pub categories: Vec<String>,
    pub most_used: Vec<ToolSummary>,
    /// Highest success rate among tools with enough calls
    pub best_performing: Vec<ToolSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolHealth {
    Healthy,
    Unhealthy,
    /// Validation panicked
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub total_tools: usize,
    pub healthy_tools: usize,
    pub unhealthy_tools: usize,
    pub tools: BTreeMap<String, ToolHealth>,
}

/// Central registry of tools.
///
/// Interior mutability lets the registry be shared as `Arc<ToolRegistry>`
/// between the orchestration loop and the executor's worker tasks.
#[derive(Default)]
pub struct ToolRegistry {
    state: RwLock<RegistryState>,
    ledger: PerformanceLedger,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    // ==================== Registration ====================

    /// Insert or replace a tool by name.
    ///
    /// Replacing keeps the tool's registration position, moves it to its new
    /// category bucket and resets its performance record. Returns `true`
    /// when an existing tool was replaced.
    pub fn register(&self, tool: Arc<dyn Tool>) -> bool {
        let name = tool.name().to_string();
        let category = tool.category().to_string();

        let replaced = {
            let mut state = self.write();
            let previous = state.tools.remove(&name);
            match &previous {
                Some(old) => {
                    let old_category = old.category.clone();
                    state.unindex(&name, &old_category);
                }
                None => state.order.push(name.clone()),
            }
            state
                .categories
                .entry(category.clone())
                .or_default()
                .push(name.clone());
            state.tools.insert(
                name.clone(),
                ToolEntry {
                    tool,
                    category: category.clone(),
                    registered_at: Utc::now(),
                },
            );
            previous.is_some()
        };
        self.ledger.reset(&name);

        if replaced {
            warn!(tool = %name, category = %category, "Tool already registered, replacing");
        } else {
            info!(tool = %name, category = %category, "Tool registered");
        }
        replaced
    }

    /// Remove a tool, its category index entry and its performance record.
    pub fn unregister(&self, name: &str) -> Result<(), RegistryError> {
        {
            let mut state = self.write();
            let Some(entry) = state.tools.remove(name) else {
                warn!(tool = %name, "Tool not found for unregistration");
                return Err(RegistryError::NotFound(name.to_string()));
            };
            state.order.retain(|n| n != name);
            state.unindex(name, &entry.category);
        }
        self.ledger.remove(name);
        info!(tool = %name, "Tool unregistered");
        Ok(())
    }

    // ==================== Lookup ====================

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.read()
            .tools
            .get(name)
            .map(|entry| Arc::clone(&entry.tool))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tool names in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Category names, sorted
    pub fn categories(&self) -> Vec<String> {
        self.read().categories.keys().cloned().collect()
    }

    pub fn tools_in_category(&self, category: &str) -> Vec<Arc<dyn Tool>> {
        self.read()
            .bucket(category)
            .into_iter()
            .map(|(_, tool)| tool)
            .collect()
    }

    pub fn tool_info(&self, name: &str) -> Option<ToolInfo> {
        let (description, category, registered_at) = {
            let state = self.read();
            let entry = state.tools.get(name)?;
            (
                entry.tool.description().to_string(),
                entry.category.clone(),
                entry.registered_at,
            )
        };
        let record = self.ledger.snapshot(name).unwrap_or_default();

        Some(ToolInfo {
            name: name.to_string(),
            description,
            category,
            registered_at,
            usage_count: record.total_calls(),
            successful_calls: record.successful_calls(),
            success_rate: record.success_rate(),
            mean_latency_secs: record.mean_latency_secs(),
            last_used: record.last_used(),
            recent_errors: record.recent_errors().cloned().collect(),
        })
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    // ==================== Selection ====================

    /// Rank up to `max_tools` distinct, registered, validated tool names.
    pub fn select(
        &self,
        query: &str,
        context: &QueryContext,
        strategy: SelectionStrategy,
        max_tools: usize,
    ) -> Vec<String> {
        if max_tools == 0 {
            return Vec::new();
        }

        let selected = match strategy {
            SelectionStrategy::Performance => self.select_by_performance(query, context, max_tools),
            SelectionStrategy::Category => self.select_by_category(query, context, max_tools),
            SelectionStrategy::Relevance => self.select_by_relevance(query, context, max_tools),
            SelectionStrategy::Hybrid => self.select_hybrid(query, context, max_tools),
        };

        debug!(strategy = %strategy, tools = ?selected, "Selected tools");
        selected
    }

    fn select_by_performance(
        &self,
        query: &str,
        context: &QueryContext,
        max_tools: usize,
    ) -> Vec<String> {
        let tools = self.read().ordered();
        let records = self.ledger.snapshot_all();

        let scored = tools
            .into_iter()
            .filter(|(_, tool)| tool.validate(query, context))
            .map(|(name, _)| {
                let score = records.get(&name).map(performance_score).unwrap_or_else(|| {
                    performance_score(&Default::default())
                });
                (name, score)
            })
            .collect();

        rank_descending(scored, max_tools)
    }

    fn select_by_category(
        &self,
        query: &str,
        context: &QueryContext,
        max_tools: usize,
    ) -> Vec<String> {
        let mut selected: Vec<String> = Vec::new();

        for category in categories_for(context.query_type) {
            let bucket = self.read().bucket(category);
            for (name, tool) in bucket {
                if selected.len() >= max_tools {
                    return selected;
                }
                if !selected.contains(&name) && tool.validate(query, context) {
                    selected.push(name);
                }
            }
        }

        selected
    }

    fn select_by_relevance(
        &self,
        query: &str,
        context: &QueryContext,
        max_tools: usize,
    ) -> Vec<String> {
        let tools = self.read().ordered();

        let scored = tools
            .into_iter()
            .filter(|(_, tool)| tool.validate(query, context))
            .map(|(name, tool)| {
                let score = relevance_score(query, tool.description());
                (name, score)
            })
            .collect();

        rank_descending(scored, max_tools)
    }

    fn select_hybrid(&self, query: &str, context: &QueryContext, max_tools: usize) -> Vec<String> {
        let by_performance = self.select_by_performance(query, context, max_tools);
        let by_category = self.select_by_category(query, context, max_tools);
        let by_relevance = self.select_by_relevance(query, context, max_tools);

        combine_hybrid(
            &[
                (HYBRID_PERFORMANCE_WEIGHT, &by_performance),
                (HYBRID_CATEGORY_WEIGHT, &by_category),
                (HYBRID_RELEVANCE_WEIGHT, &by_relevance),
            ],
            max_tools,
        )
    }

    // ==================== Execution ====================

    /// Run one tool and record the invocation in the ledger.
    ///
    /// Never fails: unknown names, validation rejections, returned errors,
    /// panics and malformed outcomes all become failed outcomes. Every
    /// invocation of a registered tool is recorded exactly once.
    pub async fn execute_and_record(
        &self,
        name: &str,
        query: &str,
        context: &QueryContext,
    ) -> ToolOutcome {
        self.execute_and_commit(name, query, context, &AtomicBool::new(false))
            .await
    }

    /// Like [`execute_and_record`](Self::execute_and_record), but the ledger
    /// entry is written only if `committed` is still unset when the tool
    /// returns. Whoever flips the flag first owns the single record.
    pub async fn execute_and_commit(
        &self,
        name: &str,
        query: &str,
        context: &QueryContext,
        committed: &AtomicBool,
    ) -> ToolOutcome {
        let Some(tool) = self.get_tool(name) else {
            warn!(tool = %name, "Tool not found at execution");
            return ToolOutcome::failure(name, ToolError::not_found(name));
        };

        let started = Instant::now();
        let outcome = if !tool.validate(query, context) {
            ToolOutcome::failure(name, ToolError::validation_failed(name))
        } else {
            match AssertUnwindSafe(tool.execute(query, context))
                .catch_unwind()
                .await
            {
                Ok(Ok(mut outcome)) => match outcome.check_well_formed() {
                    Ok(()) => {
                        outcome.tool_name = name.to_string();
                        outcome
                    }
                    Err(reason) => {
                        ToolOutcome::failure(name, ToolError::malformed_output(reason))
                    }
                },
                Ok(Err(error)) => ToolOutcome::failure(name, error),
                Err(payload) => ToolOutcome::failure(
                    name,
                    ToolError::execution_failed(panic_message(payload.as_ref())),
                ),
            }
        };
        let latency = started.elapsed();
        let outcome = outcome.with_latency(latency);

        if committed.swap(true, Ordering::SeqCst) {
            debug!(tool = %name, "Late completion discarded, invocation already recorded");
            return outcome;
        }
        let error = outcome.error().map(|e| e.to_string());
        self.ledger
            .record(name, outcome.is_success(), latency, error.as_deref());

        match outcome.error() {
            None => debug!(tool = %name, latency_ms = latency.as_millis() as u64, "Tool succeeded"),
            Some(e) => warn!(tool = %name, error = %e, "Tool failed"),
        }
        outcome
    }

    // ==================== Introspection ====================

    pub fn stats(&self) -> RegistryStats {
        let (names, categories) = {
            let state = self.read();
            (
                state.order.clone(),
                state.categories.keys().cloned().collect::<Vec<_>>(),
            )
        };
        let records = self.ledger.snapshot_all();

        let summaries: Vec<(ToolSummary, u64)> = names
            .iter()
            .map(|name| {
                let record = records.get(name).cloned().unwrap_or_default();
                (
                    ToolSummary {
                        name: name.clone(),
                        usage_count: record.total_calls(),
                        success_rate: record.success_rate(),
                        mean_latency_secs: record.mean_latency_secs(),
                    },
                    record.successful_calls(),
                )
            })
            .collect();

        let total_calls: u64 = summaries.iter().map(|(s, _)| s.usage_count).sum();
        let total_successes: u64 = summaries.iter().map(|(_, ok)| ok).sum();
        let overall_success_rate = if total_calls > 0 {
            total_successes as f64 / total_calls as f64
        } else {
            0.0
        };

        let mut most_used: Vec<ToolSummary> = summaries.iter().map(|(s, _)| s.clone()).collect();
        most_used.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        most_used.truncate(STATS_TOP_N);

        let mut best_performing: Vec<ToolSummary> = summaries
            .into_iter()
            .map(|(s, _)| s)
            .filter(|s| s.usage_count >= BEST_PERFORMER_MIN_CALLS)
            .collect();
        best_performing.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        best_performing.truncate(STATS_TOP_N);

        RegistryStats {
            total_tools: names.len(),
            total_categories: categories.len(),
            total_calls,
            overall_success_rate,
            categories,
            most_used,
            best_performing,
        }
    }

    /// Validate every tool against a fixed check query.
    pub fn health_check(&self) -> HealthReport {
        let tools = self.read().ordered();
        let check_ctx = QueryContext::new("health-check", "health-check", HEALTH_CHECK_QUERY);

        let mut report = HealthReport {
            status: HealthStatus::Healthy,
            total_tools: tools.len(),
            healthy_tools: 0,
            unhealthy_tools: 0,
            tools: BTreeMap::new(),
        };

        for (name, tool) in tools {
            let health = match std::panic::catch_unwind(AssertUnwindSafe(|| {
                tool.validate(HEALTH_CHECK_QUERY, &check_ctx)
            })) {
                Ok(true) => ToolHealth::Healthy,
                Ok(false) => ToolHealth::Unhealthy,
                Err(payload) => ToolHealth::Error(panic_message(payload.as_ref())),
            };
            if health == ToolHealth::Healthy {
                report.healthy_tools += 1;
            } else {
                report.unhealthy_tools += 1;
            }
            report.tools.insert(name, health);
        }

        if report.unhealthy_tools > 0 {
            report.status = HealthStatus::Degraded;
        }
        if report.healthy_tools == 0 {
            report.status = HealthStatus::Critical;
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("tool panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("tool panicked: {}", s)
    } else {
        "tool panicked".to_string()
    }
}
