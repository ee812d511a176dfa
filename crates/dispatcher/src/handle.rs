//! OutputHandle - manages an output with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{Batch, Output, SignalerRef};
use signal::{signal, signal_completed, signal_failed, split};

use crate::metrics::OutputMetrics;

/// A batch queued for one output, with the signaler to report it to
struct Delivery {
    batch: Arc<Batch>,
    signaler: Option<SignalerRef>,
}

/// Handle to a running output worker
pub struct OutputHandle {
    /// Output name
    name: String,
    /// Channel to send batches to worker
    tx: mpsc::Sender<Delivery>,
    /// Shared metrics
    metrics: Arc<OutputMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl OutputHandle {
    /// Create a new OutputHandle and spawn the worker task
    ///
    /// Batches are written in chunks of at most `bulk_max_size` events.
    pub fn spawn<O: Output + Send + 'static>(
        output: O,
        queue_capacity: usize,
        bulk_max_size: usize,
    ) -> Self {
        let name = output.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(OutputMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            output_worker(output, rx, worker_metrics, worker_name, bulk_max_size.max(1)).await;
        });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get output name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<OutputMetrics> {
        &self.metrics
    }

    /// Queue a batch for the output (non-blocking)
    ///
    /// Returns true if queued. If the queue is full or the worker is gone the
    /// batch is reported `failed` to `signaler` right away and false is returned.
    pub fn try_send(&self, batch: Arc<Batch>, signaler: Option<SignalerRef>) -> bool {
        match self.tx.try_send(Delivery { batch, signaler }) {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(d)) => {
                self.metrics.inc_batches_dropped();
                observability::record_batch_dropped(&self.name);
                warn!(
                    output = %self.name,
                    batch_id = d.batch.batch_id,
                    "Queue full, batch failed"
                );
                signal_failed(d.signaler.as_deref());
                false
            }
            Err(mpsc::error::TrySendError::Closed(d)) => {
                self.metrics.inc_batches_dropped();
                observability::record_batch_dropped(&self.name);
                error!(
                    output = %self.name,
                    batch_id = d.batch.batch_id,
                    "Output worker closed unexpectedly, batch failed"
                );
                signal_failed(d.signaler.as_deref());
                false
            }
        }
    }

    /// Shutdown the output worker gracefully
    ///
    /// Batches already queued are still written and acknowledged.
    #[instrument(name = "output_handle_shutdown", skip(self), fields(output = %self.name))]
    pub async fn shutdown(self) {
        // Drop sender to signal worker to stop
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(output = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(output = %self.name, "OutputHandle shutdown complete");
    }
}

/// Worker task that consumes batches and writes them to the output
#[instrument(
    name = "output_worker_loop",
    skip(output, rx, metrics),
    fields(output = %name)
)]
async fn output_worker<O: Output>(
    mut output: O,
    mut rx: mpsc::Receiver<Delivery>,
    metrics: Arc<OutputMetrics>,
    name: String,
    bulk_max_size: usize,
) {
    debug!(output = %name, bulk_max_size, "Output worker started");

    while let Some(Delivery { batch, signaler }) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        if batch.is_empty() {
            signal_completed(signaler.as_deref());
            continue;
        }

        // One report per chunk; the batch signaler fires after the last one.
        let chunk_signal = split(signaler, batch.chunk_count(bulk_max_size));

        for chunk in batch.chunks(bulk_max_size) {
            let result = output.write(batch.batch_id, chunk).await;
            match &result {
                Ok(()) => metrics.inc_chunks_written(),
                Err(e) => {
                    metrics.inc_chunks_failed();
                    error!(
                        output = %name,
                        batch_id = batch.batch_id,
                        events = chunk.len(),
                        error = %e,
                        "Chunk write failed"
                    );
                }
            }
            observability::record_chunk_written(&name, result.is_ok());
            signal(chunk_signal.as_deref(), &result);
        }
    }

    // Cleanup
    if let Err(e) = output.flush().await {
        error!(output = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = output.close().await {
        error!(output = %name, error = %e, "Close failed on shutdown");
    }

    debug!(output = %name, "Output worker stopped");
}
