//! Performance ledger: one [`PerformanceRecord`] per registered tool.

use rag_domain::PerformanceRecord;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Rolling per-tool statistics.
///
/// Updates for one tool are serialized through the internal lock.
#[derive(Debug, Default)]
pub struct PerformanceLedger {
    records: Mutex<HashMap<String, PerformanceRecord>>,
}

impl PerformanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PerformanceRecord>> {
        // Counters stay consistent even if a holder panicked
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start (or restart) tracking `name` with a zeroed record
    pub fn reset(&self, name: &str) {
        self.lock().insert(name.to_string(), PerformanceRecord::new());
    }

    pub fn remove(&self, name: &str) -> Option<PerformanceRecord> {
        self.lock().remove(name)
    }

    /// Fold one invocation into `name`'s record.
    ///
    /// Ignored for names that are not tracked (e.g. unregistered mid-batch).
    pub fn record(&self, name: &str, success: bool, latency: Duration, error: Option<&str>) {
        if let Some(record) = self.lock().get_mut(name) {
            record.record(success, latency, error);
        }
    }

    /// Copy of `name`'s current record
    pub fn snapshot(&self, name: &str) -> Option<PerformanceRecord> {
        self.lock().get(name).cloned()
    }

    /// Copy of every record
    pub fn snapshot_all(&self) -> HashMap<String, PerformanceRecord> {
        self.lock().clone()
    }
}
