use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::time::Instant;

/// Statistics regarding the pool
#[derive(Debug, Default)]
pub struct PoolMetrics {
    acquired: AtomicUsize,
    failed: AtomicUsize,
    total_waiting: AtomicU64,
}

// 64bit microseconds is 580000 years - really not important
#[allow(clippy::cast_possible_truncation)]
impl PoolMetrics {
    pub(crate) fn record_acquired(&self, start: Instant) {
        let waiting = start.elapsed().as_micros() as u64;
        let _ = self.total_waiting.fetch_add(waiting, Ordering::Relaxed);
        let _ = self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        let _ = self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

impl PoolMetrics {
    /// Get the number of resources handed out by the pool
    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::Relaxed)
    }
    /// Get the number of acquisitions that returned no resource
    pub fn failure_count(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
    /// Get the total number of microseconds that successful acquisitions spent waiting
    pub fn microseconds_waiting(&self) -> u64 {
        self.total_waiting.load(Ordering::Relaxed)
    }
}
