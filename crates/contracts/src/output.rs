//! Output trait - Dispatcher destination interface
//!
//! Defines the abstract interface for outputs.

use crate::{ContractError, Event};

/// Event output trait
///
/// All output implementations must implement this trait. Outputs only return
/// results; translating a result into an acknowledgement is the caller's job.
#[trait_variant::make(Output: Send)]
pub trait LocalOutput {
    /// Output name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one chunk of a batch
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, batch_id: u64, events: &[Event]) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close output
    async fn close(&mut self) -> Result<(), ContractError>;
}
