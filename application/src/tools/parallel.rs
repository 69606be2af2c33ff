//! Parallel tool execution with a shared batch deadline.

use super::registry::ToolRegistry;
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use rag_domain::{QueryContext, ToolError, ToolOutcome};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs a set of tools concurrently against one read-only context.
///
/// - At most `max_workers` tools execute at once; the rest queue.
/// - Each tool's failure is isolated into its own failed outcome.
/// - When the batch deadline passes, unfinished tools are detached and
///   recorded in the ledger as `TIMEOUT` failures. A detached tool that
///   finishes later is discarded, so every call is counted once.
#[derive(Clone)]
pub struct ParallelExecutor {
    registry: Arc<ToolRegistry>,
}

impl ParallelExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Execute without progress callbacks
    pub async fn run(
        &self,
        tool_names: &[String],
        query: &str,
        context: Arc<QueryContext>,
        max_workers: usize,
        timeout: Duration,
    ) -> BTreeMap<String, ToolOutcome> {
        self.run_with_progress(tool_names, query, context, max_workers, timeout, &NoProgress)
            .await
    }

    /// Execute the batch, returning one outcome per distinct name.
    pub async fn run_with_progress(
        &self,
        tool_names: &[String],
        query: &str,
        context: Arc<QueryContext>,
        max_workers: usize,
        timeout: Duration,
        progress: &dyn OrchestrationProgress,
    ) -> BTreeMap<String, ToolOutcome> {
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut join_set = JoinSet::new();
        let mut task_names = HashMap::new();
        let mut commit_flags: HashMap<String, Arc<AtomicBool>> = HashMap::new();
        let mut pending: BTreeSet<String> = BTreeSet::new();
        let mut results = BTreeMap::new();

        for name in tool_names {
            if pending.contains(name) || results.contains_key(name) {
                continue;
            }
            if !self.registry.contains(name) {
                warn!(tool = %name, "Skipping unregistered tool");
                progress.on_tool_complete(name, false);
                results.insert(
                    name.clone(),
                    ToolOutcome::failure(name, ToolError::not_found(name)),
                );
                continue;
            }

            let registry = Arc::clone(&self.registry);
            let semaphore = Arc::clone(&semaphore);
            let context = Arc::clone(&context);
            let query = query.to_string();
            let task_name = name.clone();
            let committed = Arc::new(AtomicBool::new(false));
            let task_committed = Arc::clone(&committed);

            let handle = join_set.spawn(async move {
                // Permit is held for the whole execution
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = registry
                    .execute_and_commit(&task_name, &query, &context, &task_committed)
                    .await;
                (task_name, outcome)
            });
            task_names.insert(handle.id(), name.clone());
            commit_flags.insert(name.clone(), committed);
            pending.insert(name.clone());
        }

        info!(
            "Running {} tools (max {} concurrent, timeout {:?})",
            pending.len(),
            max_workers,
            timeout
        );

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((name, outcome)))) => {
                    debug!(tool = %name, success = outcome.is_success(), "Tool finished");
                    progress.on_tool_complete(&name, outcome.is_success());
                    pending.remove(&name);
                    results.insert(name, outcome);
                }
                Ok(Some(Err(join_error))) => {
                    // Panics are caught inside execute_and_record; this is a cancelled task
                    warn!("Tool task join error: {}", join_error);
                    if let Some(name) = task_names.get(&join_error.id()) {
                        progress.on_tool_complete(name, false);
                        pending.remove(name);
                        results.insert(
                            name.clone(),
                            ToolOutcome::failure(
                                name,
                                ToolError::execution_failed(join_error.to_string()),
                            ),
                        );
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Batch deadline of {:?} elapsed with {} tools unfinished",
                        timeout,
                        pending.len()
                    );
                    join_set.detach_all();
                    break;
                }
            }
        }

        for name in pending {
            progress.on_tool_complete(&name, false);
            let error = ToolError::timeout(timeout);
            let claimed = commit_flags
                .get(&name)
                .is_some_and(|flag| !flag.swap(true, Ordering::SeqCst));
            if claimed {
                let message = error.to_string();
                self.registry
                    .ledger()
                    .record(&name, false, timeout, Some(&message));
            }
            let outcome = ToolOutcome::failure(&name, error).with_latency(timeout);
            results.insert(name, outcome);
        }

        results
    }
}
