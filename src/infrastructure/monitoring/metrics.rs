use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters describing how interaction sync is behaving on this client.
///
/// Everything is a relaxed atomic: the numbers are diagnostics, not
/// coordination.
pub struct SyncMetrics {
    toggles_committed: AtomicU64,
    toggles_rolled_back: AtomicU64,
    toggles_skipped: AtomicU64,
    initial_load_failures: AtomicU64,
    degraded_reads: AtomicU64,
    batch_windows: AtomicU64,
    batched_requests: AtomicU64,

    /// Creation time for uptime reporting
    start_time: Instant,
}

/// Point-in-time copy of [`SyncMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMetricsSnapshot {
    pub toggles_committed: u64,
    pub toggles_rolled_back: u64,
    pub toggles_skipped: u64,
    pub initial_load_failures: u64,
    pub degraded_reads: u64,
    pub batch_windows: u64,
    pub batched_requests: u64,
    /// Share of finished toggles that had to be rolled back (0.0 when none ran)
    pub rollback_rate: f64,
    pub uptime_seconds: u64,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            toggles_committed: AtomicU64::new(0),
            toggles_rolled_back: AtomicU64::new(0),
            toggles_skipped: AtomicU64::new(0),
            initial_load_failures: AtomicU64::new(0),
            degraded_reads: AtomicU64::new(0),
            batch_windows: AtomicU64::new(0),
            batched_requests: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_toggle_committed(&self) {
        self.toggles_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_toggle_rolled_back(&self) {
        self.toggles_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_toggle_skipped(&self) {
        self.toggles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_initial_load_failed(&self) {
        self.initial_load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded_read(&self) {
        self.degraded_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_window(&self, size: usize) {
        self.batch_windows.fetch_add(1, Ordering::Relaxed);
        self.batched_requests
            .fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        let committed = self.toggles_committed.load(Ordering::Relaxed);
        let rolled_back = self.toggles_rolled_back.load(Ordering::Relaxed);
        SyncMetricsSnapshot {
            toggles_committed: committed,
            toggles_rolled_back: rolled_back,
            toggles_skipped: self.toggles_skipped.load(Ordering::Relaxed),
            initial_load_failures: self.initial_load_failures.load(Ordering::Relaxed),
            degraded_reads: self.degraded_reads.load(Ordering::Relaxed),
            batch_windows: self.batch_windows.load(Ordering::Relaxed),
            batched_requests: self.batched_requests.load(Ordering::Relaxed),
            rollback_rate: Self::ratio(rolled_back, committed + rolled_back),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    fn ratio(part: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        part as f64 / total as f64
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}
