//! Run orchestration.
//!
//! One scheduled invocation walks the full chain: list capture objects,
//! select the trailing window, read and rebuild feature rows, score
//! with the loaded estimator, publish analysis points. Stages fail
//! fast; a failed stage leaves no retry state behind because a
//! re-invocation re-derives everything from storage.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::capture::{self, read_capture_file, PathTimeError, ReadError};
use crate::dataset::{Dataset, DatasetError, TimestampSpec};
use crate::estimate::{BundleError, EstimateError, ModelStore, Period};
use crate::publish::{self, MetricSink, PublishError};
use crate::storage::{ObjectStore, StorageError};
use mw_common::{Error, Result, RunId};
use mw_config::MonitorConfig;

/// Wall-clock budget for one run.
///
/// Checked at stage boundaries, before each capture file, and before
/// each published point, so a run never overshoots its deadline by more
/// than one unit of work.
#[derive(Debug, Clone)]
pub struct RunBudget {
    started: Instant,
    limit: Option<Duration>,
}

impl RunBudget {
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            limit: None,
        }
    }

    pub fn with_limit(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail with the stage name once the limit has elapsed.
    pub fn check(&self, stage: &str) -> Result<()> {
        if let Some(limit) = self.limit {
            if self.elapsed() > limit {
                return Err(Error::DeadlineExceeded {
                    stage: stage.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// What one run did, for the operator-facing report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub window_minutes: u32,
    pub files_listed: usize,
    pub files_selected: usize,
    pub dataset_rows: usize,
    pub result_rows: usize,
    pub points_published: usize,
    pub elapsed_ms: u64,
}

/// The monitoring pipeline, wired to a capture store, a model store,
/// and a metric sink.
pub struct Pipeline {
    config: MonitorConfig,
    store: Box<dyn ObjectStore>,
    models: ModelStore,
    sink: Box<dyn MetricSink>,
}

impl Pipeline {
    pub fn new(
        config: MonitorConfig,
        store: Box<dyn ObjectStore>,
        models: ModelStore,
        sink: Box<dyn MetricSink>,
    ) -> Self {
        Self {
            config,
            store,
            models,
            sink,
        }
    }

    /// Execute one run ending at `end_time`.
    pub fn run(
        &self,
        run_id: &RunId,
        end_time: chrono::DateTime<chrono::Utc>,
        budget: &RunBudget,
    ) -> Result<RunSummary> {
        budget.check("list")?;
        let listed = self.store.list(&self.config.capture_root)?;
        tracing::debug!(
            target: "pipeline.list",
            prefix = %self.config.capture_root,
            objects = listed.len(),
            "Listed capture store"
        );

        budget.check("select")?;
        let window = chrono::Duration::minutes(i64::from(self.config.window_minutes));
        let selected = capture::select_window(&listed, end_time, window)?;
        if selected.is_empty() {
            return Err(Error::EmptyWindow {
                window_minutes: self.config.window_minutes,
                end: end_time,
            });
        }

        let mut raw_rows = Vec::new();
        for path in &selected {
            budget.check("read")?;
            raw_rows.extend(read_capture_file(self.store.as_ref(), path)?);
        }

        budget.check("build")?;
        let spec = TimestampSpec {
            column: self.config.timestamp_column.clone(),
            format: self.config.timestamp_format.clone(),
        };
        let dataset = Dataset::from_rows(&raw_rows, &self.config.headers, Some(&spec))?;

        budget.check("estimate")?;
        let estimator = self
            .models
            .load(&self.config.model_path, &self.config.model_kind)?;
        let result = estimator.estimate(&dataset)?;
        let analysis = result.filter_period(Period::Analysis);

        budget.check("publish")?;
        let points = publish::points(
            &analysis,
            &self.config.tracked_columns,
            &self.config.namespace,
            &self.config.dimensions,
        );
        let mut published = 0;
        for point in &points {
            budget.check("publish")?;
            tracing::debug!(
                target: "publish.point",
                name = %point.name,
                timestamp = %point.timestamp,
                "Publishing metric point"
            );
            self.sink.put(point)?;
            published += 1;
        }

        let summary = RunSummary {
            run_id: run_id.clone(),
            end_time,
            window_minutes: self.config.window_minutes,
            files_listed: listed.len(),
            files_selected: selected.len(),
            dataset_rows: dataset.len(),
            result_rows: analysis.rows.len(),
            points_published: published,
            elapsed_ms: budget.elapsed().as_millis() as u64,
        };
        tracing::info!(
            target: "pipeline.publish",
            run_id = %summary.run_id,
            points = summary.points_published,
            elapsed_ms = summary.elapsed_ms,
            "Run complete"
        );
        Ok(summary)
    }
}

// ── Error conversion ────────────────────────────────────────────────────

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<PathTimeError> for Error {
    fn from(e: PathTimeError) -> Self {
        match e {
            PathTimeError::TooShort { path } => Error::PathFormat {
                path,
                reason: "fewer than five segments".to_string(),
            },
            PathTimeError::BadSegment { path, segment } => Error::PathFormat {
                path,
                reason: format!("segment {segment:?} is not a number"),
            },
            PathTimeError::OutOfRange { path } => Error::PathFormat {
                path,
                reason: "no valid calendar time".to_string(),
            },
        }
    }
}

impl From<ReadError> for Error {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Storage(inner) => inner.into(),
            ReadError::BadRecord { path, line, source } => Error::CaptureRecord {
                path,
                line,
                reason: source.to_string(),
            },
            io @ ReadError::Io { .. } => Error::Storage(io.to_string()),
        }
    }
}

impl From<DatasetError> for Error {
    fn from(e: DatasetError) -> Self {
        match e {
            DatasetError::SchemaMismatch {
                row,
                expected,
                actual,
            } => Error::SchemaMismatch {
                row,
                expected,
                actual,
            },
            DatasetError::Timestamp { column, value, .. } => {
                Error::TimestampParse { column, value }
            }
            DatasetError::NoSuchColumn(column) => Error::InvalidConfig(format!(
                "timestamp column {column:?} is not in headers"
            )),
        }
    }
}

impl From<BundleError> for Error {
    fn from(e: BundleError) -> Self {
        Error::ModelStore(e.to_string())
    }
}

impl From<EstimateError> for Error {
    fn from(e: EstimateError) -> Self {
        Error::Estimation(e.to_string())
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Error::Publish(e.to_string())
    }
}
