//! Configuration validation.
//!
//! Checks every engine setting before any data is fetched.

use crate::domain::engine_config::DataFormat;
use crate::domain::error::EodError;
use crate::domain::table_set::Bounds;
use crate::ports::config_port::ConfigPort;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), EodError> {
    validate_data_format(config)?;
    validate_data_path(config)?;
    validate_timeout(config)?;
    validate_bounds(config)?;
    validate_rolling_period(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EodError {
    EodError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_format(config: &dyn ConfigPort) -> Result<(), EodError> {
    if let Some(format) = config.get_string("data", "format") {
        format
            .parse::<DataFormat>()
            .map_err(|reason| invalid("data", "format", reason))?;
    }
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), EodError> {
    match config.get_string("data", "path") {
        Some(_) => Ok(()),
        None => Err(EodError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), EodError> {
    if let Some(raw) = config.get_string("fetch", "timeout_secs") {
        match raw.parse::<i64>() {
            Ok(secs) if secs >= 0 => {}
            _ => {
                return Err(invalid(
                    "fetch",
                    "timeout_secs",
                    "timeout_secs must be a non-negative integer",
                ));
            }
        }
    }
    Ok(())
}

fn validate_bounds(config: &dyn ConfigPort) -> Result<(), EodError> {
    if let Some(bounds) = config.get_string("merge", "bounds") {
        bounds
            .parse::<Bounds>()
            .map_err(|reason| invalid("merge", "bounds", reason))?;
    }
    Ok(())
}

fn validate_rolling_period(config: &dyn ConfigPort) -> Result<(), EodError> {
    if let Some(raw) = config.get_string("risk", "rolling_period") {
        match raw.parse::<i64>() {
            Ok(period) if period >= 1 => {}
            _ => {
                return Err(invalid(
                    "risk",
                    "rolling_period",
                    "rolling_period must be a positive integer",
                ));
            }
        }
    }
    Ok(())
}
