//! Metric publication.
//!
//! An estimation result is flattened into individual data points, one
//! per tracked (row, column) pair, and handed to a [`MetricSink`] one
//! put at a time. Points already sent stay sent; the first sink failure
//! aborts the rest.

pub mod gateway;

pub use gateway::HttpGateway;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::estimate::{EstimationResult, MetricValue};
use mw_config::Dimension;

/// Scalar value carried by a published point. Booleans are coerced to
/// `Int(0|1)` before publication and never serialized as a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

/// Unit attached to a published point. Every point currently goes out
/// unitless, matching the backend's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "None")]
    None,
}

/// One published data point.
#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub namespace: String,
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub timestamp: DateTime<Utc>,
    pub value: Scalar,
    pub unit: Unit,
}

/// Errors from the metric sink.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("gateway returned HTTP {status}")]
    Status { status: u16 },

    #[error("gateway transport: {0}")]
    Transport(String),

    #[error("sink rejected point {name}: {reason}")]
    Rejected { name: String, reason: String },
}

/// Synchronous metric sink: one put per data point.
pub trait MetricSink {
    fn put(&self, point: &MetricPoint) -> Result<(), PublishError>;
}

/// Flatten an estimation result into publishable points.
///
/// Result columns are filtered to the tracked component names. Rows
/// missing a value in any tracked column are dropped whole. Point order
/// is row-major: all of one row's columns before the next row's.
pub fn points(
    result: &EstimationResult,
    tracked: &[String],
    namespace: &str,
    dimensions: &[Dimension],
) -> Vec<MetricPoint> {
    let selected: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .filter(|(_, key)| tracked.iter().any(|t| t == &key.name))
        .map(|(i, _)| i)
        .collect();

    let mut out = Vec::new();
    for row in &result.rows {
        let complete = selected.iter().all(|&i| row.cells[i].is_some());
        if !complete {
            continue;
        }
        for &i in &selected {
            if let Some(value) = row.cells[i] {
                out.push(MetricPoint {
                    namespace: namespace.to_string(),
                    name: result.columns[i].metric_name(),
                    dimensions: dimensions.to_vec(),
                    timestamp: row.chunk_start,
                    value: scalar(value),
                    unit: Unit::None,
                });
            }
        }
    }
    out
}

fn scalar(value: MetricValue) -> Scalar {
    match value {
        MetricValue::Float(v) => Scalar::Float(v),
        MetricValue::Bool(b) => Scalar::Int(i64::from(b)),
    }
}

/// Sink for dry runs: each point goes to the log instead of a backend.
#[derive(Debug, Default)]
pub struct LogSink;

impl MetricSink for LogSink {
    fn put(&self, point: &MetricPoint) -> Result<(), PublishError> {
        tracing::info!(
            target: "publish.dry_run",
            name = %point.name,
            value = ?point.value,
            timestamp = %point.timestamp,
            "Would publish metric point"
        );
        Ok(())
    }
}

/// In-memory sink for tests. Clones share one buffer, so a clone handed
/// to the pipeline can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

#[derive(Debug, Default)]
struct SinkState {
    points: Vec<MetricPoint>,
    fail_at: Option<usize>,
    calls: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th put call (1-based); earlier calls succeed.
    pub fn fail_at(&self, n: usize) {
        self.state.lock().expect("sink lock").fail_at = Some(n);
    }

    /// Points delivered so far.
    pub fn points(&self) -> Vec<MetricPoint> {
        self.state.lock().expect("sink lock").points.clone()
    }

    /// Total put calls, including the failed one.
    pub fn call_count(&self) -> usize {
        self.state.lock().expect("sink lock").calls
    }
}

impl MetricSink for MemorySink {
    fn put(&self, point: &MetricPoint) -> Result<(), PublishError> {
        let mut state = self.state.lock().expect("sink lock");
        state.calls += 1;
        if state.fail_at == Some(state.calls) {
            return Err(PublishError::Rejected {
                name: point.name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        state.points.push(point.clone());
        Ok(())
    }
}
