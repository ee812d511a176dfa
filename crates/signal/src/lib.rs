//! # Signal
//!
//! Acknowledgement aggregation for batches shipped through the pipeline.
//!
//! Provides:
//! - [`SplitSignal`]: fan-in, N reports collapse into one, failure is sticky
//! - [`CompositeSignal`]: fan-out, one report is forwarded to many signalers
//! - Nil-tolerant helpers ([`signal`], [`signal_all`], ...) for optional signalers
//! - Consumer signalers: [`AckSignal`] (awaitable) and [`SignalCounter`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use contracts::SignalerRef;
//! use signal::{split, SignalCounter, Signaler};
//!
//! let counter = Arc::new(SignalCounter::new());
//! let downstream: SignalerRef = counter.clone();
//!
//! // One batch written in three chunks
//! let chunk_signal = split(Some(downstream), 3).unwrap();
//! chunk_signal.completed();
//! chunk_signal.failed();
//! chunk_signal.completed();
//!
//! assert_eq!(counter.snapshot().failed, 1);
//! assert_eq!(counter.snapshot().completed, 0);
//! ```

pub mod ack;
pub mod composite;
pub mod counter;
pub mod dispatch;
pub mod split;

pub use ack::{AckReceiver, AckSignal};
pub use composite::{composite, CompositeSignal};
pub use contracts::{Outcome, Signaler, SignalerRef};
pub use counter::{SignalCounter, SignalSnapshot};
pub use dispatch::{signal, signal_all, signal_completed, signal_failed};
pub use split::{split, SplitSignal};
