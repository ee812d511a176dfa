//! Batch - unit of work shipped to outputs
//!
//! A batch is acknowledged as a whole; outputs may write it in chunks.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Single event carried by a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Sequence number assigned by the producer
    pub sequence: u64,

    /// Producer timestamp (milliseconds since the unix epoch)
    pub timestamp_ms: u64,

    /// Raw event body
    pub payload: Bytes,

    /// Free-form metadata
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl Event {
    /// Create an event without metadata
    pub fn new(sequence: u64, timestamp_ms: u64, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence,
            timestamp_ms,
            payload: payload.into(),
            fields: HashMap::new(),
        }
    }

    /// Attach a metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Batch of events, acknowledged exactly once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch sequence number (monotonically increasing per producer)
    pub batch_id: u64,

    /// Events in publish order
    pub events: Vec<Event>,
}

impl Batch {
    pub fn new(batch_id: u64, events: Vec<Event>) -> Self {
        Self { batch_id, events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of chunks produced by [`Batch::chunks`] for `bulk_max_size`
    ///
    /// A zero `bulk_max_size` is treated as 1.
    pub fn chunk_count(&self, bulk_max_size: usize) -> usize {
        self.events.len().div_ceil(bulk_max_size.max(1))
    }

    /// Split events into chunks of at most `bulk_max_size`
    ///
    /// A zero `bulk_max_size` is treated as 1.
    pub fn chunks(&self, bulk_max_size: usize) -> std::slice::Chunks<'_, Event> {
        self.events.chunks(bulk_max_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_of(n: u64) -> Batch {
        let events = (0..n).map(|i| Event::new(i, 1_000 + i, "x")).collect();
        Batch::new(7, events)
    }

    #[test]
    fn test_chunk_count_matches_chunks() {
        let batch = batch_of(10);
        for size in [1, 3, 4, 10, 11] {
            assert_eq!(batch.chunk_count(size), batch.chunks(size).count());
        }
        assert_eq!(batch.chunk_count(3), 4);
        assert_eq!(batch.chunk_count(0), 10);
    }

    #[test]
    fn test_empty_batch_has_no_chunks() {
        let batch = Batch::new(1, Vec::new());
        assert!(batch.is_empty());
        assert_eq!(batch.chunk_count(5), 0);
    }

    #[test]
    fn test_event_fields() {
        let event = Event::new(1, 2, "body").with_field("host", "web-1");
        assert_eq!(event.fields.get("host").map(String::as_str), Some("web-1"));
        assert_eq!(&event.payload[..], b"body");
    }

    #[test]
    fn test_batch_serde() {
        let batch = batch_of(2);
        let json = serde_json::to_string(&batch).unwrap();
        let back: Batch = serde_json::from_str(&json).unwrap();
        assert_eq!(batch, back);
    }
}
