//! Run statistics.

use std::time::Duration;

use observability::AckSummary;
use signal::SignalSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Batches handed to the dispatcher
    pub batches_published: u64,

    /// Batches rejected at publish time (dispatcher already gone)
    pub publish_failures: u64,

    /// Events carried by published batches
    pub events_published: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Number of configured outputs
    pub active_outputs: usize,

    /// Outcomes as counted by the shared observer
    pub acks: SignalSnapshot,

    /// Per-batch ack outcomes and latency
    pub summary: AckSummary,
}

impl RunStats {
    /// Acknowledged batches per second
    pub fn batches_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.acks.completed + self.acks.failed) as f64 / secs
        } else {
            0.0
        }
    }

    /// Every published batch got exactly one acknowledgement
    pub fn all_acknowledged(&self) -> bool {
        self.summary.lost == 0
            && self.acks.completed + self.acks.failed
                == self.batches_published + self.publish_failures
    }

    pub fn print_summary(&self) {
        println!("\n=== Run Statistics ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Outputs: {}", self.active_outputs);
        println!("Batches published: {}", self.batches_published);
        if self.publish_failures > 0 {
            println!("Batches rejected at publish: {}", self.publish_failures);
        }
        println!("Events published: {}", self.events_published);
        println!("Throughput: {:.2} batches/s", self.batches_per_sec());
        println!(
            "Shared observer: completed={}, failed={}",
            self.acks.completed, self.acks.failed
        );
        println!();
        print!("{}", self.summary);
        println!();
    }
}
