//! Per-tool rolling performance statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Number of recent error descriptions kept per tool.
pub const ERROR_HISTORY_LIMIT: usize = 10;

/// A recorded failure description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Rolling statistics for one tool.
///
/// The mean latency is maintained incrementally; no latency window is
/// stored. Only the last [`ERROR_HISTORY_LIMIT`] errors are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    total_calls: u64,
    successful_calls: u64,
    /// Mean latency in seconds
    mean_latency: f64,
    recent_errors: VecDeque<ErrorSample>,
    last_used: Option<DateTime<Utc>>,
}

impl PerformanceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed invocation into the statistics.
    ///
    /// `error` is only kept for failed calls.
    pub fn record(&mut self, success: bool, latency: Duration, error: Option<&str>) {
        self.total_calls += 1;
        self.last_used = Some(Utc::now());

        if success {
            self.successful_calls += 1;
        } else if let Some(message) = error {
            self.recent_errors.push_back(ErrorSample {
                message: message.to_string(),
                timestamp: Utc::now(),
            });
            while self.recent_errors.len() > ERROR_HISTORY_LIMIT {
                self.recent_errors.pop_front();
            }
        }

        let n = self.total_calls as f64;
        self.mean_latency = (self.mean_latency * (n - 1.0) + latency.as_secs_f64()) / n;
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }

    pub fn successful_calls(&self) -> u64 {
        self.successful_calls
    }

    pub fn failed_calls(&self) -> u64 {
        self.total_calls - self.successful_calls
    }

    /// Success ratio in [0, 1]; 0.0 before the first call
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.successful_calls as f64 / self.total_calls as f64
        }
    }

    /// Mean latency in seconds
    pub fn mean_latency_secs(&self) -> f64 {
        self.mean_latency
    }

    pub fn recent_errors(&self) -> impl Iterator<Item = &ErrorSample> {
        self.recent_errors.iter()
    }

    pub fn last_used(&self) -> Option<DateTime<Utc>> {
        self.last_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_record() {
        let record = PerformanceRecord::new();
        assert_eq!(record.total_calls(), 0);
        assert_eq!(record.success_rate(), 0.0);
        assert_eq!(record.mean_latency_secs(), 0.0);
        assert!(record.last_used().is_none());
    }

    #[test]
    fn test_incremental_mean_latency() {
        let mut record = PerformanceRecord::new();
        record.record(true, Duration::from_secs(1), None);
        record.record(true, Duration::from_secs(3), None);
        record.record(false, Duration::from_secs(2), Some("boom"));

        assert_eq!(record.total_calls(), 3);
        assert_eq!(record.successful_calls(), 2);
        assert_eq!(record.failed_calls(), 1);
        assert!((record.mean_latency_secs() - 2.0).abs() < 1e-9);
        assert!((record.success_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_error_ring_evicts_oldest() {
        let mut record = PerformanceRecord::new();
        for i in 0..15 {
            record.record(false, Duration::ZERO, Some(&format!("error {}", i)));
        }

        let errors: Vec<_> = record.recent_errors().map(|e| e.message.as_str()).collect();
        assert_eq!(errors.len(), ERROR_HISTORY_LIMIT);
        assert_eq!(errors[0], "error 5");
        assert_eq!(errors[9], "error 14");
    }

    #[test]
    fn test_consecutive_failures_converge_to_zero() {
        let mut record = PerformanceRecord::new();
        for _ in 0..20 {
            record.record(false, Duration::from_millis(5), Some("fail"));
        }
        assert_eq!(record.success_rate(), 0.0);
        assert_eq!(record.failed_calls(), 20);
    }

    #[test]
    fn test_success_does_not_store_error() {
        let mut record = PerformanceRecord::new();
        record.record(true, Duration::ZERO, Some("ignored"));
        assert_eq!(record.recent_errors().count(), 0);
    }
}
