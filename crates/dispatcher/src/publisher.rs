//! Publisher - producer side of the dispatcher input

use tokio::sync::mpsc;
use tracing::warn;

use contracts::{Batch, SignalerRef};
use signal::signal_all;

use crate::error::DispatcherError;

/// A batch together with everyone interested in its outcome
pub struct PublishRequest {
    pub batch: Batch,
    /// Observers notified once with the final outcome; absent slots are skipped
    pub observers: Vec<Option<SignalerRef>>,
}

impl PublishRequest {
    pub fn new(batch: Batch, observers: Vec<Option<SignalerRef>>) -> Self {
        Self { batch, observers }
    }
}

/// Cloneable producer handle
#[derive(Clone)]
pub struct Publisher {
    tx: mpsc::Sender<PublishRequest>,
}

/// Create a publisher and the receiver a [`Dispatcher`](crate::Dispatcher) consumes
pub fn channel(capacity: usize) -> (Publisher, mpsc::Receiver<PublishRequest>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Publisher { tx }, rx)
}

impl Publisher {
    /// Publish a batch, waiting for queue space
    ///
    /// If the dispatcher is gone the observers are told `failed` and an error is returned.
    pub async fn publish(
        &self,
        batch: Batch,
        observers: Vec<Option<SignalerRef>>,
    ) -> Result<(), DispatcherError> {
        let batch_id = batch.batch_id;
        if let Err(mpsc::error::SendError(req)) =
            self.tx.send(PublishRequest::new(batch, observers)).await
        {
            let result = Err(DispatcherError::Closed { batch_id });
            warn!(batch_id, "Dispatcher closed, batch failed");
            signal_all(Some(req.observers.as_slice()), &result);
            return result;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal::SignalCounter;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_publish_after_close_fails_observers() {
        let (publisher, rx) = channel(4);
        drop(rx);

        let counter = Arc::new(SignalCounter::new());
        let result = publisher
            .publish(Batch::new(9, Vec::new()), vec![Some(counter.clone() as SignalerRef), None])
            .await;

        assert!(matches!(result, Err(DispatcherError::Closed { batch_id: 9 })));
        assert_eq!(counter.snapshot().failed, 1);
    }

    #[tokio::test]
    async fn test_publish_delivers_request() {
        let (publisher, mut rx) = channel(4);
        publisher
            .publish(Batch::new(1, Vec::new()), Vec::new())
            .await
            .unwrap();

        let req = rx.recv().await.unwrap();
        assert_eq!(req.batch.batch_id, 1);
        assert!(req.observers.is_empty());
    }
}
