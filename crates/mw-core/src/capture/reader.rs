//! Capture record parsing.
//!
//! Each capture object is JSON lines, one record per line, using the
//! endpoint data-capture field layout. A record's input payload, output
//! payload, and inference time are rebuilt into one comma-joined
//! feature row.

use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

use crate::storage::{ObjectStore, StorageError};

/// One captured inference event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    pub capture_data: CaptureData,
    pub event_metadata: EventMetadata,
}

/// Input and output payloads of a captured call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureData {
    pub endpoint_input: Payload,
    pub endpoint_output: Payload,
}

/// One payload body.
#[derive(Debug, Deserialize)]
pub struct Payload {
    pub data: String,
}

/// Event-level metadata of a captured call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub inference_time: String,
}

impl CaptureRecord {
    /// Rebuild the comma-joined feature row for this record.
    pub fn feature_row(&self) -> String {
        format!(
            "{},{},{}",
            self.capture_data.endpoint_input.data,
            self.capture_data.endpoint_output.data,
            self.event_metadata.inference_time
        )
    }
}

/// Errors from reading one capture object.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{path} line {line}: {source}")]
    BadRecord {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read one capture object and rebuild its feature rows.
///
/// A malformed line fails the whole file; there is no partial recovery.
pub fn read_capture_file(store: &dyn ObjectStore, path: &str) -> Result<Vec<String>, ReadError> {
    let reader = store.open(path)?;
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ReadError::Io {
            path: path.to_string(),
            source,
        })?;
        let record: CaptureRecord =
            serde_json::from_str(&line).map_err(|source| ReadError::BadRecord {
                path: path.to_string(),
                line: index + 1,
                source,
            })?;
        rows.push(record.feature_row());
    }
    tracing::debug!(
        target: "capture.read",
        path = %path,
        records = rows.len(),
        "Read capture file"
    );
    Ok(rows)
}
