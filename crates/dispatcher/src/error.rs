//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Output creation error
    #[error("failed to create output '{name}': {message}")]
    OutputCreation { name: String, message: String },

    /// Dispatcher input closed, batch not accepted
    #[error("dispatcher closed, batch {batch_id} rejected")]
    Closed { batch_id: u64 },

    /// Output write error (from contract)
    #[error("output error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create an output creation error
    pub fn output_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
