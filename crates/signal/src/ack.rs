//! AckSignal - awaitable consumer signaler
//!
//! Lets an async producer wait for the final outcome of a batch.

use std::sync::Mutex;

use contracts::{Outcome, Signaler};
use tokio::sync::oneshot;
use tracing::debug;

/// Resolves an [`AckReceiver`] with the first outcome it receives.
///
/// Later reports are ignored.
#[derive(Debug)]
pub struct AckSignal {
    tx: Mutex<Option<oneshot::Sender<Outcome>>>,
}

/// Receiving half of an [`AckSignal`]
#[derive(Debug)]
pub struct AckReceiver {
    rx: oneshot::Receiver<Outcome>,
}

impl AckSignal {
    /// Create a connected signaler/receiver pair
    pub fn channel() -> (Self, AckReceiver) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            AckReceiver { rx },
        )
    }

    fn resolve(&self, outcome: Outcome) {
        let tx = match self.tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match tx {
            // Receiver may already be gone; nobody is waiting then.
            Some(tx) => {
                let _ = tx.send(outcome);
            }
            None => debug!(%outcome, "AckSignal already resolved, report ignored"),
        }
    }
}

impl Signaler for AckSignal {
    fn completed(&self) {
        self.resolve(Outcome::Completed);
    }

    fn failed(&self) {
        self.resolve(Outcome::Failed);
    }
}

impl AckReceiver {
    /// Wait for the outcome
    ///
    /// Returns `None` if the signaler was dropped without being signalled.
    pub async fn wait(self) -> Option<Outcome> {
        self.rx.await.ok()
    }

    /// Non-blocking check; `None` while unresolved or after the signaler was dropped
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        self.rx.try_recv().ok()
    }
}
