//! Configuration validation.
//!
//! Checks the `[data]`, `[filter]` and `[report]` sections before any data
//! is loaded. Every key is optional; present keys must be well formed.

use crate::domain::error::LakaspiacError;
use crate::domain::record::PropertyType;
use crate::domain::selection::{parse_districts, parse_years};
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), LakaspiacError> {
    validate_data_path(config)?;
    validate_years(config)?;
    validate_districts(config)?;
    validate_property_type(config)?;
    validate_positive(config, "report", "top_n")?;
    validate_positive(config, "report", "histogram_bins")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> LakaspiacError {
    LakaspiacError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), LakaspiacError> {
    match config.get_string("data", "path") {
        Some(s) if s.trim().is_empty() => Err(invalid("data", "path", "path must not be empty")),
        _ => Ok(()),
    }
}

fn validate_years(config: &dyn ConfigPort) -> Result<(), LakaspiacError> {
    if let Some(s) = config.get_string("filter", "years") {
        parse_years(&s).map_err(|e| invalid("filter", "years", e.to_string()))?;
    }
    Ok(())
}

fn validate_districts(config: &dyn ConfigPort) -> Result<(), LakaspiacError> {
    if let Some(s) = config.get_string("filter", "districts") {
        parse_districts(&s).map_err(|e| invalid("filter", "districts", e.to_string()))?;
    }
    Ok(())
}

fn validate_property_type(config: &dyn ConfigPort) -> Result<(), LakaspiacError> {
    if let Some(s) = config.get_string("filter", "property_type") {
        s.parse::<PropertyType>()
            .map_err(|e| invalid("filter", "property_type", e.to_string()))?;
    }
    Ok(())
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), LakaspiacError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 1 => Ok(()),
        Ok(_) => Err(invalid(section, key, format!("{key} must be at least 1"))),
        Err(_) => Err(invalid(section, key, format!("{key} must be a whole number"))),
    }
}
