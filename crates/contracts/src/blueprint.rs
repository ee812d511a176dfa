//! ShipperBlueprint - Config Loader output
//!
//! Describes the pipeline settings and the output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete shipper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipperBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Pipeline-wide defaults
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Output routing
    pub outputs: Vec<OutputConfig>,
}

/// Pipeline-wide defaults, overridable per output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Max events per chunk written to an output
    #[serde(default = "default_bulk_max_size")]
    pub bulk_max_size: usize,

    /// Capacity of the dispatcher input queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            bulk_max_size: default_bulk_max_size(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output name
    pub name: String,

    /// Output type
    pub output_type: OutputType,

    /// Queue capacity (batches)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Chunk size override (falls back to `pipeline.bulk_max_size`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_max_size: Option<usize>,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl OutputConfig {
    /// Effective chunk size for this output
    pub fn effective_bulk_max_size(&self, settings: &PipelineSettings) -> usize {
        self.bulk_max_size.unwrap_or(settings.bulk_max_size)
    }
}

fn default_bulk_max_size() -> usize {
    50
}

fn default_queue_capacity() -> usize {
    100
}

/// Output type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// Log chunk summaries via tracing
    Log,
    /// Append JSON lines to a file
    File,
}
