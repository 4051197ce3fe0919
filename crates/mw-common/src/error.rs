//! Error types for modelwatch.

use thiserror::Error;

/// Result type alias for modelwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for modelwatch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid monitor configuration: {0}")]
    InvalidConfig(String),

    // Storage errors (20-29)
    #[error("object storage error: {0}")]
    Storage(String),

    #[error("malformed capture path {path}: {reason}")]
    PathFormat { path: String, reason: String },

    // Dataset errors (30-39)
    #[error("bad capture record at {path} line {line}: {reason}")]
    CaptureRecord {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("row {row} has {actual} fields, header has {expected}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cannot parse timestamp {value:?} in column {column}")]
    TimestampParse { column: String, value: String },

    #[error("no capture records in the {window_minutes}-minute window ending {end}")]
    EmptyWindow {
        window_minutes: u32,
        end: chrono::DateTime<chrono::Utc>,
    },

    // Estimation errors (40-49)
    #[error("model store error: {0}")]
    ModelStore(String),

    #[error("estimation failed: {0}")]
    Estimation(String),

    // Publish errors (50-59)
    #[error("metric publish failed: {0}")]
    Publish(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Budget errors (70-79)
    #[error("run deadline exceeded at stage {stage}")]
    DeadlineExceeded { stage: String },
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::Storage(_) => 20,
            Error::PathFormat { .. } => 21,
            Error::CaptureRecord { .. } => 30,
            Error::SchemaMismatch { .. } => 31,
            Error::TimestampParse { .. } => 32,
            Error::EmptyWindow { .. } => 33,
            Error::ModelStore(_) => 40,
            Error::Estimation(_) => 41,
            Error::Publish(_) => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::DeadlineExceeded { .. } => 70,
        }
    }
}
