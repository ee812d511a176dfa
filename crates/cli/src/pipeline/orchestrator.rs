//! Pipeline orchestrator - publishes synthetic batches and collects their acks.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use contracts::{Batch, Event, Outcome, ShipperBlueprint, SignalerRef};
use dispatcher::create_dispatcher;
use observability::AckStatsAggregator;
use signal::{AckSignal, SignalCounter};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::RunStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The shipper blueprint
    pub blueprint: ShipperBlueprint,

    /// Number of synthetic batches to publish
    pub batches: u64,

    /// Events per batch
    pub batch_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    ///
    /// Returns once every published batch was acknowledged and the dispatcher
    /// drained its outputs.
    pub async fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let (publisher, input_rx) = dispatcher::channel(blueprint.pipeline.queue_capacity);
        let dispatcher = create_dispatcher(blueprint, input_rx)
            .await
            .context("Failed to create dispatcher")?;
        let active_outputs = dispatcher.metrics().len();
        let dispatcher_task = dispatcher.spawn();

        info!(
            outputs = active_outputs,
            batches = self.config.batches,
            batch_size = self.config.batch_size,
            "Publishing synthetic batches"
        );

        let shared = Arc::new(SignalCounter::new());
        let mut pending = JoinSet::new();
        let mut stats = RunStats {
            active_outputs,
            ..Default::default()
        };

        for batch_id in 0..self.config.batches {
            let batch = synthetic_batch(batch_id, self.config.batch_size);
            let events = batch.len() as u64;
            let (ack, ack_rx) = AckSignal::channel();
            let observers: Vec<Option<SignalerRef>> = vec![
                Some(Arc::new(ack) as SignalerRef),
                Some(Arc::clone(&shared) as SignalerRef),
            ];

            let published_at = Instant::now();
            match publisher.publish(batch, observers).await {
                Ok(()) => {
                    stats.batches_published += 1;
                    stats.events_published += events;
                }
                Err(e) => {
                    warn!(batch_id, error = %e, "Publish failed");
                    stats.publish_failures += 1;
                }
            }

            pending.spawn(async move { (ack_rx.wait().await, published_at.elapsed()) });
        }

        // Closing the input lets the dispatcher drain and stop.
        drop(publisher);

        let mut aggregator = AckStatsAggregator::new();
        while let Some(joined) = pending.join_next().await {
            let (outcome, latency) =
                joined.map_err(|e| CliError::pipeline_execution(format!("ack task: {e}")))?;
            record_ack(&mut aggregator, outcome, latency);
        }

        let dispatcher_acks = dispatcher_task
            .await
            .map_err(|e| CliError::pipeline_execution(format!("dispatcher task: {e}")))?;
        debug!(
            completed = dispatcher_acks.completed,
            failed = dispatcher_acks.failed,
            "Dispatcher acknowledgements"
        );

        stats.acks = shared.snapshot();
        stats.summary = aggregator.summary();
        stats.duration = start_time.elapsed();

        if !stats.all_acknowledged() {
            warn!(
                lost = stats.summary.lost,
                "Some batches were never acknowledged"
            );
        }

        Ok(stats)
    }
}

fn record_ack(aggregator: &mut AckStatsAggregator, outcome: Option<Outcome>, latency: Duration) {
    match outcome {
        Some(outcome) => aggregator.update(outcome, latency.as_secs_f64() * 1000.0),
        None => aggregator.record_lost(),
    }
}

/// Build a batch of `size` synthetic JSON events
fn synthetic_batch(batch_id: u64, size: usize) -> Batch {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let first_seq = batch_id * size as u64;

    let events = (0..size as u64)
        .map(|i| {
            let seq = first_seq + i;
            Event::new(seq, now_ms, format!(r#"{{"seq":{seq},"batch":{batch_id}}}"#))
                .with_field("source", "synthetic")
        })
        .collect();

    Batch::new(batch_id, events)
}
