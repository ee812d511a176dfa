//! SplitSignal - fan-in of N reports into one
//!
//! Guards one downstream signaler from multiple calls with a countdown.
//! Used when a batch is pushed to several outputs or written in several chunks.

use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::Arc;

use contracts::{Signaler, SignalerRef};
use tracing::warn;

/// Collapses `count` reports into exactly one downstream report.
///
/// The report that moves the countdown from 1 to 0 forwards `failed` if any
/// report failed, `completed` otherwise.
pub struct SplitSignal {
    remaining: AtomicIsize,
    failed: AtomicBool,
    signaler: SignalerRef,
}

impl SplitSignal {
    /// Guard `signaler` until `count` reports arrived.
    ///
    /// Returns `None` if `signaler` is `None`: nobody listens, so there is nothing to guard.
    pub fn new(signaler: Option<SignalerRef>, count: usize) -> Option<Self> {
        let signaler = signaler?;
        if count == 0 {
            warn!("SplitSignal created with count 0, downstream will never be signalled");
        }

        Some(Self {
            remaining: AtomicIsize::new(isize::try_from(count).unwrap_or(isize::MAX)),
            failed: AtomicBool::new(false),
            signaler,
        })
    }

    /// Reports still expected before the downstream signaler fires
    pub fn remaining(&self) -> isize {
        self.remaining.load(Ordering::Acquire)
    }

    fn on_event(&self) {
        // AcqRel: the winner observes every `failed` store made before any decrement.
        let prev = self.remaining.fetch_sub(1, Ordering::AcqRel);
        match prev {
            1 => {
                if self.failed.load(Ordering::Acquire) {
                    self.signaler.failed();
                } else {
                    self.signaler.completed();
                }
            }
            p if p <= 0 => {
                warn!(remaining = p - 1, "SplitSignal received more reports than expected");
            }
            _ => {}
        }
    }
}

impl Signaler for SplitSignal {
    fn completed(&self) {
        self.on_event();
    }

    fn failed(&self) {
        self.failed.store(true, Ordering::Release);
        self.on_event();
    }
}

impl std::fmt::Debug for SplitSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitSignal")
            .field("remaining", &self.remaining())
            .field("failed", &self.failed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

/// Shared form of [`SplitSignal::new`], ready to hand to `count` report sites.
pub fn split(signaler: Option<SignalerRef>, count: usize) -> Option<SignalerRef> {
    SplitSignal::new(signaler, count).map(|s| Arc::new(s) as SignalerRef)
}
