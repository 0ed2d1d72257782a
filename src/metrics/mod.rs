//! Metrics collection module
//!
//! Tracks search volume, rejected requests, backend failures and latency.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-wide search counters
#[derive(Debug, Default)]
pub struct Metrics {
    /// Searches that reached the executor and succeeded
    searches: AtomicU64,
    /// Requests rejected by validation
    rejected: AtomicU64,
    /// Executor failures
    failures: AtomicU64,
    /// Records returned across all searches
    records_returned: AtomicU64,
    /// Summed executor latency of successful searches
    total_latency_ms: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful search
    pub fn record_success(&self, elapsed: Duration, records: usize) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.records_returned
            .fetch_add(records as u64, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        let searches = self.searches.load(Ordering::Relaxed);
        let total_latency_ms = self.total_latency_ms.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);

        MetricsSnapshot {
            searches,
            rejected: self.rejected.load(Ordering::Relaxed),
            failures,
            records_returned: self.records_returned.load(Ordering::Relaxed),
            avg_latency_ms: (searches > 0).then(|| total_latency_ms / searches),
            reliability: reliability(searches, failures),
        }
    }
}

fn reliability(successes: u64, failures: u64) -> f64 {
    let total = successes + failures;
    if total == 0 {
        100.0
    } else {
        (successes as f64 / total as f64) * 100.0
    }
}

/// Serializable view served by `/stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub rejected: u64,
    pub failures: u64,
    pub records_returned: u64,
    pub avg_latency_ms: Option<u64>,
    /// Percentage of executed searches that succeeded
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_success(Duration::from_millis(100), 10);
        metrics.record_success(Duration::from_millis(300), 5);
        metrics.record_failure();
        metrics.record_rejection();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.searches, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.records_returned, 15);
        assert_eq!(snapshot.avg_latency_ms, Some(200));
        assert!((snapshot.reliability - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_latency_ms, None);
        assert_eq!(snapshot.reliability, 100.0);
    }
}
