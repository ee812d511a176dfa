//! Shipper metrics
//!
//! Prometheus counters for acknowledgements plus an in-memory aggregator
//! used for end-of-run summaries.

use contracts::Outcome;
use metrics::{counter, histogram};

/// Record the final acknowledgement of one batch
pub fn record_batch_acked(outcome: Outcome) {
    counter!(
        "batch_shipper_batches_acked_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record one chunk write attempt on an output
pub fn record_chunk_written(output_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "batch_shipper_chunks_written_total",
        "output" => output_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a batch failed because the output queue was full
pub fn record_batch_dropped(output_name: &str) {
    counter!(
        "batch_shipper_batches_dropped_total",
        "output" => output_name.to_string()
    )
    .increment(1);
}

/// Record time from publish to final acknowledgement
pub fn record_ack_latency_ms(latency_ms: f64) {
    histogram!("batch_shipper_ack_latency_ms").record(latency_ms);
}

/// Acknowledgement statistics aggregator
///
/// Aggregates in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct AckStatsAggregator {
    /// Batches acknowledged `completed`
    pub completed: u64,

    /// Batches acknowledged `failed`
    pub failed: u64,

    /// Batches whose signaler was dropped without an acknowledgement
    pub lost: u64,

    /// Ack latency (ms)
    pub latency_stats: RunningStats,
}

impl AckStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one acknowledged batch
    pub fn update(&mut self, outcome: Outcome, latency_ms: f64) {
        match outcome {
            Outcome::Completed => self.completed += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.latency_stats.push(latency_ms);
        record_ack_latency_ms(latency_ms);
    }

    /// Record a batch that never got acknowledged
    pub fn record_lost(&mut self) {
        self.lost += 1;
    }

    pub fn total(&self) -> u64 {
        self.completed + self.failed + self.lost
    }

    pub fn summary(&self) -> AckSummary {
        let total = self.total();
        AckSummary {
            total_batches: total,
            completed: self.completed,
            failed: self.failed,
            lost: self.lost,
            failure_rate: if total > 0 {
                (self.failed + self.lost) as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Acknowledgement summary
#[derive(Debug, Clone, Default)]
pub struct AckSummary {
    pub total_batches: u64,
    pub completed: u64,
    pub failed: u64,
    pub lost: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for AckSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Ack Summary ===")?;
        writeln!(f, "Total batches: {}", self.total_batches)?;
        writeln!(f, "Completed: {}", self.completed)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        if self.lost > 0 {
            writeln!(f, "Never acknowledged: {}", self.lost)?;
        }
        writeln!(f, "Ack latency (ms): {}", self.latency_ms)
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
