//! # Dispatcher
//!
//! Batch shipping stage.
//!
//! Responsibilities:
//! - Consume `PublishRequest`s (a batch plus its observers)
//! - Fan out each batch to every configured output
//! - Write batches in chunks of `bulk_max_size` events
//! - Acknowledge every batch exactly once: the observers get `failed` if any
//!   output failed any chunk, `completed` otherwise
//! - Isolate slow outputs; a full queue fails the batch instead of blocking

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod outputs;
pub mod publisher;

pub use contracts::{Batch, Event, Output};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::OutputHandle;
pub use metrics::{BatchAckRecorder, MetricsSnapshot, OutputMetrics};
pub use outputs::{FileOutput, LogOutput};
pub use publisher::{channel, PublishRequest, Publisher};
