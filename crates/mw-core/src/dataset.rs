//! Tabular dataset rebuilt from capture feature rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors from dataset construction.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("row {row} has {actual} fields, header has {expected}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}, column {column}: cannot parse timestamp {value:?}")]
    Timestamp {
        row: usize,
        column: String,
        value: String,
    },

    #[error("timestamp column {0:?} is not in the header")]
    NoSuchColumn(String),
}

/// Which column is parsed as the observation timestamp, and how.
#[derive(Debug, Clone)]
pub struct TimestampSpec {
    pub column: String,
    pub format: String,
}

/// An ordered, rectangular table of string cells.
///
/// Every row has exactly as many fields as the header; construction
/// fails otherwise. When a timestamp column is configured, its cells
/// are parsed eagerly so downstream consumers never see a raw value.
#[derive(Debug, Clone)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    timestamps: Vec<DateTime<Utc>>,
}

impl Dataset {
    /// Build a dataset from comma-joined feature rows.
    pub fn from_rows(
        raw_rows: &[String],
        header: &[String],
        timestamp_spec: Option<&TimestampSpec>,
    ) -> Result<Self, DatasetError> {
        let mut rows = Vec::with_capacity(raw_rows.len());
        for (index, raw) in raw_rows.iter().enumerate() {
            let cells: Vec<String> = raw.split(',').map(str::to_string).collect();
            if cells.len() != header.len() {
                return Err(DatasetError::SchemaMismatch {
                    row: index,
                    expected: header.len(),
                    actual: cells.len(),
                });
            }
            rows.push(cells);
        }

        let mut timestamps = Vec::new();
        if let Some(spec) = timestamp_spec {
            let col = header
                .iter()
                .position(|h| h == &spec.column)
                .ok_or_else(|| DatasetError::NoSuchColumn(spec.column.clone()))?;
            timestamps.reserve(rows.len());
            for (index, row) in rows.iter().enumerate() {
                let value = &row[col];
                let parsed = NaiveDateTime::parse_from_str(value, &spec.format)
                    .map(|dt| dt.and_utc())
                    .map_err(|_| DatasetError::Timestamp {
                        row: index,
                        column: spec.column.clone(),
                        value: value.clone(),
                    })?;
                timestamps.push(parsed);
            }
        }

        Ok(Self {
            header: header.to_vec(),
            rows,
            timestamps,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Parsed timestamps, one per row, when a timestamp column was
    /// configured. Empty otherwise.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// All cells of one named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.header.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}
