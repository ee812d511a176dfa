//! Config validation
//!
//! Rules:
//! - output names are non-empty and unique
//! - `bulk_max_size` > 0 (pipeline default and per-output override)
//! - `queue_capacity` > 0
//! - file outputs carry a `base_path` param

use std::collections::HashSet;

use contracts::{ContractError, OutputType, ShipperBlueprint};

/// Validate a ShipperBlueprint
///
/// Returns the first error found.
pub fn validate(blueprint: &ShipperBlueprint) -> Result<(), ContractError> {
    validate_pipeline(blueprint)?;
    validate_output_names(blueprint)?;
    validate_output_settings(blueprint)?;
    Ok(())
}

fn validate_pipeline(blueprint: &ShipperBlueprint) -> Result<(), ContractError> {
    let pipeline = &blueprint.pipeline;
    if pipeline.bulk_max_size == 0 {
        return Err(ContractError::config_validation(
            "pipeline.bulk_max_size",
            "bulk_max_size must be > 0",
        ));
    }
    if pipeline.queue_capacity == 0 {
        return Err(ContractError::config_validation(
            "pipeline.queue_capacity",
            "queue_capacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_output_names(blueprint: &ShipperBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, output) in blueprint.outputs.iter().enumerate() {
        if output.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("outputs[{idx}].name"),
                "output name cannot be empty",
            ));
        }
        if !seen.insert(output.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("outputs[name={}]", output.name),
                "duplicate output name",
            ));
        }
    }
    Ok(())
}

fn validate_output_settings(blueprint: &ShipperBlueprint) -> Result<(), ContractError> {
    for output in &blueprint.outputs {
        if output.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("outputs[{}].queue_capacity", output.name),
                "queue_capacity must be > 0",
            ));
        }
        if output.bulk_max_size == Some(0) {
            return Err(ContractError::config_validation(
                format!("outputs[{}].bulk_max_size", output.name),
                "bulk_max_size must be > 0",
            ));
        }
        if output.output_type == OutputType::File && !output.params.contains_key("base_path") {
            return Err(ContractError::config_validation(
                format!("outputs[{}].params.base_path", output.name),
                "file output requires 'base_path'",
            ));
        }
    }
    Ok(())
}
