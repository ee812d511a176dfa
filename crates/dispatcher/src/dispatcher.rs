//! Dispatcher - main loop for fan-out of batches to outputs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{Batch, OutputConfig, OutputType, PipelineSettings, ShipperBlueprint, SignalerRef};
use signal::{composite, signal_completed, split, SignalCounter, SignalSnapshot};

use crate::error::DispatcherError;
use crate::handle::OutputHandle;
use crate::metrics::{BatchAckRecorder, MetricsSnapshot};
use crate::outputs::{FileOutput, LogOutput};
use crate::publisher::PublishRequest;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Output configurations
    pub outputs: Vec<OutputConfig>,
    /// Defaults applied to outputs without overrides
    pub settings: PipelineSettings,
}

impl From<&ShipperBlueprint> for DispatcherConfig {
    fn from(blueprint: &ShipperBlueprint) -> Self {
        Self {
            outputs: blueprint.outputs.clone(),
            settings: blueprint.pipeline.clone(),
        }
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    input_rx: mpsc::Receiver<PublishRequest>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, input_rx: mpsc::Receiver<PublishRequest>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the output workers
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub async fn build(self) -> Result<Dispatcher, DispatcherError> {
        let handles = Self::initialize_handles(&self.config)?;
        Ok(Dispatcher::with_handles(handles, self.input_rx))
    }

    #[instrument(
        name = "dispatcher_initialize_handles",
        skip(config),
        fields(output_count = config.outputs.len())
    )]
    fn initialize_handles(config: &DispatcherConfig) -> Result<Vec<OutputHandle>, DispatcherError> {
        config
            .outputs
            .iter()
            .map(|output| create_output_handle(output, &config.settings))
            .collect()
    }
}

/// Create an OutputHandle from configuration
#[instrument(
    name = "dispatcher_create_output_handle",
    skip(config, settings),
    fields(output = %config.name, output_type = ?config.output_type)
)]
fn create_output_handle(
    config: &OutputConfig,
    settings: &PipelineSettings,
) -> Result<OutputHandle, DispatcherError> {
    let bulk_max_size = config.effective_bulk_max_size(settings);
    match config.output_type {
        OutputType::Log => {
            let output = LogOutput::new(&config.name);
            Ok(OutputHandle::spawn(output, config.queue_capacity, bulk_max_size))
        }
        OutputType::File => {
            let output = FileOutput::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::output_creation(&config.name, e.to_string()))?;
            Ok(OutputHandle::spawn(output, config.queue_capacity, bulk_max_size))
        }
    }
}

/// The main Dispatcher that fans out batches to outputs
pub struct Dispatcher {
    handles: Vec<OutputHandle>,
    input_rx: mpsc::Receiver<PublishRequest>,
    /// Final outcome of every dispatched batch
    acks: Arc<SignalCounter>,
    recorder: Arc<BatchAckRecorder>,
}

impl Dispatcher {
    /// Create a dispatcher with custom output handles (for testing)
    pub fn with_handles(
        handles: Vec<OutputHandle>,
        input_rx: mpsc::Receiver<PublishRequest>,
    ) -> Self {
        Self {
            handles,
            input_rx,
            acks: Arc::new(SignalCounter::new()),
            recorder: Arc::new(BatchAckRecorder),
        }
    }

    /// Get metrics for all outputs
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Shared view of the batch acknowledgement counts
    ///
    /// Stays valid after the dispatcher was moved into its task.
    pub fn ack_counter(&self) -> Arc<SignalCounter> {
        Arc::clone(&self.acks)
    }

    /// Run the dispatcher main loop
    ///
    /// Consumes batches from input and fans out to all outputs.
    /// Returns when input channel is closed and every output drained its queue.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(mut self) -> SignalSnapshot {
        info!(outputs = self.handles.len(), "Dispatcher started");

        let mut batch_count: u64 = 0;

        while let Some(request) = self.input_rx.recv().await {
            batch_count += 1;
            self.dispatch_batch(request);

            if batch_count.is_multiple_of(100) {
                debug!(batches = batch_count, "Dispatcher progress");
            }
        }

        info!(
            batches = batch_count,
            "Dispatcher input closed, shutting down"
        );

        Self::shutdown_handles(self.handles).await;

        let acks = self.acks.snapshot();
        info!(
            completed = acks.completed,
            failed = acks.failed,
            "Dispatcher shutdown complete"
        );
        acks
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<SignalSnapshot> {
        tokio::spawn(self.run())
    }

    /// Route one batch to every output
    ///
    /// Observers are combined into one signaler (fan-out), which is then
    /// guarded so that it fires once after every output reported (fan-in).
    fn dispatch_batch(&self, request: PublishRequest) {
        let PublishRequest { batch, mut observers } = request;
        observers.push(Some(Arc::clone(&self.acks) as SignalerRef));
        observers.push(Some(Arc::clone(&self.recorder) as SignalerRef));
        let upstream = composite(observers);

        if self.handles.is_empty() {
            debug!(batch_id = batch.batch_id, "No outputs configured, batch acknowledged");
            signal_completed(upstream.as_deref());
            return;
        }

        let batch: Arc<Batch> = Arc::new(batch);
        let per_output = split(upstream, self.handles.len());
        for handle in &self.handles {
            handle.try_send(Arc::clone(&batch), per_output.clone());
        }
    }

    async fn shutdown_handles(handles: Vec<OutputHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a dispatcher from a blueprint
#[instrument(name = "dispatcher_create", skip(blueprint, input_rx))]
pub async fn create_dispatcher(
    blueprint: &ShipperBlueprint,
    input_rx: mpsc::Receiver<PublishRequest>,
) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(DispatcherConfig::from(blueprint), input_rx)
        .build()
        .await
}
