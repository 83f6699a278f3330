//! Metrics hooks for remote filter operations
//!
//! Counts round trips to the bit store and their latencies, plus how often
//! the store failed.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use redbloom::metrics::Metrics;
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = RemoteBloomFilter::new(store, 3000, 0.03)?.with_metrics(metrics.clone());
//! filter.insert("topic", b"42", 60).await?;
//! assert_eq!(metrics.snapshot().inserts, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe counters for filter operations
#[derive(Default)]
pub struct Metrics {
    /// Successful `insert` calls
    pub inserts: AtomicU64,
    /// Bits sent to the store by successful inserts
    pub bits_written: AtomicU64,
    /// Successful `may_exist` calls
    pub lookups: AtomicU64,
    /// Lookups that answered "possibly present"
    pub lookups_positive: AtomicU64,
    /// Batches the store failed to execute
    pub store_failures: AtomicU64,
    /// Cumulative insert round-trip time in nanoseconds
    pub insert_time_ns: AtomicU64,
    /// Cumulative lookup round-trip time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful insert that wrote `offsets` bits
    pub fn record_insert(&self, duration: Duration, offsets: usize) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.bits_written.fetch_add(offsets as u64, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a successful lookup
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            bits_written: self.bits_written.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            avg_insert_ns: average(&self.insert_time_ns, &self.inserts),
            avg_lookup_ns: average(&self.lookup_time_ns, &self.lookups),
        }
    }

    /// Ratio of positive lookups to all lookups.
    ///
    /// Includes true positives; only an upper bound on the false positive rate.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.inserts,
            &self.bits_written,
            &self.lookups,
            &self.lookups_positive,
            &self.store_failures,
            &self.insert_time_ns,
            &self.lookup_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

fn average(total: &AtomicU64, count: &AtomicU64) -> u64 {
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total.load(Ordering::Relaxed) / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub bits_written: u64,
    pub lookups: u64,
    pub lookups_positive: u64,
    pub store_failures: u64,
    pub avg_insert_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward filter activity to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_insert(&self, duration: Duration, offsets: usize);

    fn record_lookup(&self, duration: Duration, found: bool);

    fn record_store_failure(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_insert(&self, _: Duration, _: usize) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_store_failure(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_insert(&self, duration: Duration, offsets: usize) {
        Metrics::record_insert(self, duration, offsets);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }

    fn record_store_failure(&self) {
        Metrics::record_store_failure(self);
    }
}
