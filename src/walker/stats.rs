//! Walk statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Statistics collected during a walk
#[derive(Debug)]
pub struct WalkStats {
    /// Listing calls issued (one per directory visited)
    pub listings: AtomicU64,

    /// Leaf entries handed to the callback
    pub leaves: AtomicU64,

    /// Bytes in leaf entries handed to the callback
    pub bytes: AtomicU64,

    /// Tasks that ended in failure, including ones that lost the race
    pub failures: AtomicU64,

    started: Instant,
}

impl WalkStats {
    pub fn new() -> Self {
        Self {
            listings: AtomicU64::new(0),
            leaves: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn record_listing(&self) {
        self.listings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_leaf(&self, bytes: u64) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the walk began
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self, outstanding: usize) -> WalkProgress {
        WalkProgress {
            dirs: self.listings.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            outstanding,
            elapsed: self.elapsed(),
        }
    }
}

impl Default for WalkStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress information for display
#[derive(Debug, Clone, Default)]
pub struct WalkProgress {
    pub dirs: u64,
    pub leaves: u64,
    pub bytes: u64,
    pub failures: u64,
    pub outstanding: usize,
    pub elapsed: Duration,
}

impl WalkProgress {
    pub fn entries_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.leaves + self.dirs) as f64 / secs
        } else {
            0.0
        }
    }
}
