//! SignalCounter - consumer signaler that only counts

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::Signaler;

/// Counts received reports
#[derive(Debug, Default)]
pub struct SignalCounter {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl SignalCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total reports received
    pub fn total(&self) -> u64 {
        let snap = self.snapshot();
        snap.completed + snap.failed
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        SignalSnapshot {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Signaler for SignalCounter {
    fn completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of a [`SignalCounter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSnapshot {
    pub completed: u64,
    pub failed: u64,
}
