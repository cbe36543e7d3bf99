//! Run counters shared by the worker pool.

use std::sync::atomic::{AtomicU64, Ordering};

/// Run counters, bumped by any worker.
#[derive(Debug, Default)]
pub struct Stats {
    moved: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes_copied: AtomicU64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub moved: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Bytes written by the copy fallback only; renames add nothing.
    pub bytes_copied: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_moved(&self) {
        self.moved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_bytes(&self, n: u64) {
        self.bytes_copied.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            moved: self.moved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_copied: self.bytes_copied.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Jobs that reached an outcome.
    pub fn total(&self) -> u64 {
        self.moved + self.skipped + self.failed
    }
}
