//! Output metrics and batch acknowledgement recording

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use contracts::{Outcome, Signaler};

/// Metrics for a single output
#[derive(Debug, Default)]
pub struct OutputMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Chunks written successfully
    chunks_written: AtomicU64,
    /// Chunks that failed to write
    chunks_failed: AtomicU64,
    /// Batches failed because the queue was full or closed
    batches_dropped: AtomicU64,
}

impl OutputMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn chunks_written(&self) -> u64 {
        self.chunks_written.load(Ordering::Relaxed)
    }

    pub fn inc_chunks_written(&self) {
        self.chunks_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn chunks_failed(&self) -> u64 {
        self.chunks_failed.load(Ordering::Relaxed)
    }

    pub fn inc_chunks_failed(&self) {
        self.chunks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batches_dropped(&self) -> u64 {
        self.batches_dropped.load(Ordering::Relaxed)
    }

    pub fn inc_batches_dropped(&self) {
        self.batches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            chunks_written: self.chunks_written(),
            chunks_failed: self.chunks_failed(),
            batches_dropped: self.batches_dropped(),
        }
    }
}

/// Snapshot of output metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub chunks_written: u64,
    pub chunks_failed: u64,
    pub batches_dropped: u64,
}

/// Observer that exports every final batch acknowledgement as a metric
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchAckRecorder;

impl Signaler for BatchAckRecorder {
    fn completed(&self) {
        observability::record_batch_acked(Outcome::Completed);
    }

    fn failed(&self) {
        observability::record_batch_acked(Outcome::Failed);
    }
}
