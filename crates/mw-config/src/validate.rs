//! Semantic validation of monitor configuration.
//!
//! serde enforces shape; these checks enforce the cross-field rules the
//! pipeline assumes (the timestamp column actually exists, the window is
//! a real duration, and so on).

use crate::monitor::MonitorConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error types.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("bad environment override {var}: {reason}")]
    EnvOverride { var: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for mw_common::Error {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::IoError(_) | ValidationError::ParseError(_) => {
                mw_common::Error::Config(e.to_string())
            }
            ValidationError::Invalid(_) | ValidationError::EnvOverride { .. } => {
                mw_common::Error::InvalidConfig(e.to_string())
            }
        }
    }
}

/// Check cross-field rules on a parsed config.
pub fn validate(config: &MonitorConfig) -> ValidationResult<()> {
    if config.headers.is_empty() {
        return Err(ValidationError::Invalid(
            "headers must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for header in &config.headers {
        if !seen.insert(header.as_str()) {
            return Err(ValidationError::Invalid(format!(
                "duplicate header {:?}",
                header
            )));
        }
    }

    if config.timestamp_column_index().is_none() {
        return Err(ValidationError::Invalid(format!(
            "timestamp column {:?} is not in headers",
            config.timestamp_column
        )));
    }

    if config.timestamp_format.is_empty() {
        return Err(ValidationError::Invalid(
            "timestamp_format must not be empty".to_string(),
        ));
    }

    if config.window_minutes == 0 {
        return Err(ValidationError::Invalid(
            "window_minutes must be positive".to_string(),
        ));
    }

    if config.namespace.is_empty() {
        return Err(ValidationError::Invalid(
            "namespace must not be empty".to_string(),
        ));
    }

    for dimension in &config.dimensions {
        if dimension.name.is_empty() {
            return Err(ValidationError::Invalid(
                "dimension names must not be empty".to_string(),
            ));
        }
    }

    if config.tracked_columns.is_empty() {
        return Err(ValidationError::Invalid(
            "tracked_columns must not be empty".to_string(),
        ));
    }

    Ok(())
}
