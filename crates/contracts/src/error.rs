//! Layered error definitions
//!
//! Categorized by source: config / output / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Output Errors =====
    /// Output write error
    #[error("output '{output_name}' write error: {message}")]
    OutputWrite {
        output_name: String,
        message: String,
    },

    /// Output setup error
    #[error("output '{output_name}' setup error: {message}")]
    OutputSetup {
        output_name: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create output write error
    pub fn output_write(output_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputWrite {
            output_name: output_name.into(),
            message: message.into(),
        }
    }

    /// Create output setup error
    pub fn output_setup(output_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputSetup {
            output_name: output_name.into(),
            message: message.into(),
        }
    }
}
