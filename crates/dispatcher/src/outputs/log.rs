//! LogOutput - logs chunk summaries via tracing

use contracts::{ContractError, Event, Output};
use tracing::{info, instrument};

/// Output that logs chunk summaries for debugging
pub struct LogOutput {
    name: String,
    events_logged: u64,
}

impl LogOutput {
    /// Create a new LogOutput with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events_logged: 0,
        }
    }

    fn log_chunk_summary(&self, batch_id: u64, events: &[Event]) {
        let bytes: usize = events.iter().map(|e| e.payload.len()).sum();

        info!(
            output = %self.name,
            batch_id,
            events = events.len(),
            bytes,
            first_seq = events.first().map(|e| e.sequence),
            last_seq = events.last().map(|e| e.sequence),
            "Chunk shipped"
        );
    }
}

impl Output for LogOutput {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_output_write",
        skip(self, events),
        fields(output = %self.name, events = events.len())
    )]
    async fn write(&mut self, batch_id: u64, events: &[Event]) -> Result<(), ContractError> {
        self.log_chunk_summary(batch_id, events);
        self.events_logged += events.len() as u64;
        Ok(())
    }

    #[instrument(name = "log_output_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log output
        Ok(())
    }

    #[instrument(name = "log_output_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(output = %self.name, events = self.events_logged, "LogOutput closed");
        Ok(())
    }
}
