//! Configuration validation
//!
//! Checks values that deserialize fine but cannot work:
//! - Empty or blank finalization types
//! - Empty time key
//! - Zero buffer sizes

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_reader(config)?;
    validate_grouping(config)?;
    validate_writer(config)?;
    Ok(())
}

fn validate_reader(config: &Config) -> Result<()> {
    if config.reader.buffer_size == 0 {
        return Err(ConfigError::invalid_value(
            "reader",
            "buffer_size",
            "must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_grouping(config: &Config) -> Result<()> {
    if config.grouping.final_types.is_empty() {
        return Err(ConfigError::invalid_value(
            "grouping",
            "final_types",
            "at least one type is required",
        ));
    }

    if let Some(i) = config
        .grouping
        .final_types
        .iter()
        .position(|t| t.trim().is_empty())
    {
        return Err(ConfigError::invalid_value(
            "grouping",
            "final_types",
            format!("entry {} is blank", i),
        ));
    }

    Ok(())
}

fn validate_writer(config: &Config) -> Result<()> {
    if config.writer.time_key.is_empty() {
        return Err(ConfigError::invalid_value(
            "writer",
            "time_key",
            "must not be empty",
        ));
    }

    if config.writer.buffer_size == 0 {
        return Err(ConfigError::invalid_value(
            "writer",
            "buffer_size",
            "must be greater than 0",
        ));
    }

    Ok(())
}
