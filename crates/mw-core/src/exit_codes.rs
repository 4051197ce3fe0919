//! Process exit codes.
//!
//! Exit codes communicate run outcome without requiring output
//! parsing: 0 is success, 10-15 name the stage that failed, 99 is a
//! fault in the tool itself.

use mw_common::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed and all points were delivered.
    Ok = 0,
    /// Configuration missing, unreadable, or invalid.
    ConfigError = 10,
    /// Capture store listing or open failed, or a path was malformed.
    StorageError = 11,
    /// Captures selected but unusable: decode, schema, timestamp, or
    /// an empty window.
    DatasetError = 12,
    /// Model bundle load or estimation failed.
    EstimationError = 13,
    /// Gateway rejected a point or was unreachable.
    PublishError = 14,
    /// Run deadline elapsed before completion.
    DeadlineExceeded = 15,
    /// Unclassified fault in the tool itself.
    InternalError = 99,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_error(self) -> bool {
        self.as_i32() >= 10
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::InvalidConfig(_) => ExitCode::ConfigError,
            Error::Storage(_) | Error::PathFormat { .. } => ExitCode::StorageError,
            Error::CaptureRecord { .. }
            | Error::SchemaMismatch { .. }
            | Error::TimestampParse { .. }
            | Error::EmptyWindow { .. } => ExitCode::DatasetError,
            Error::ModelStore(_) | Error::Estimation(_) => ExitCode::EstimationError,
            Error::Publish(_) => ExitCode::PublishError,
            Error::DeadlineExceeded { .. } => ExitCode::DeadlineExceeded,
            Error::Io(_) | Error::Json(_) => ExitCode::InternalError,
        }
    }
}
