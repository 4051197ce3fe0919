//! Performance estimation over rebuilt datasets.
//!
//! Estimators are pre-fitted artifacts loaded from the model store per
//! run. Everything downstream of estimation depends only on the
//! [`Estimator`] trait and the pair-keyed [`EstimationResult`].

pub mod bundle;
pub mod direct_loss;

pub use bundle::{BundleError, ModelBundle, ModelStore};
pub use direct_loss::DirectLossEstimator;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::dataset::Dataset;

/// Which fitting period a result row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Reference,
    Analysis,
}

/// Column key in an estimation result: metric group and component name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricKey {
    pub group: String,
    pub name: String,
}

impl MetricKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Published metric name: `<group>.<name>`.
    pub fn metric_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }
}

/// One result cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Float(f64),
    Bool(bool),
}

/// One result row: a time chunk scored by the estimator.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub period: Period,
    pub chunk_start: DateTime<Utc>,
    /// One cell per result column; `None` marks a missing value.
    pub cells: Vec<Option<MetricValue>>,
}

/// Pair-keyed estimation output. Every row carries exactly one cell per
/// column.
#[derive(Debug, Clone)]
pub struct EstimationResult {
    pub columns: Vec<MetricKey>,
    pub rows: Vec<ResultRow>,
}

impl EstimationResult {
    /// Keep only rows from one period.
    pub fn filter_period(&self, period: Period) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| r.period == period)
                .cloned()
                .collect(),
        }
    }
}

/// Errors from scoring a dataset.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("refusing to score an empty dataset")]
    EmptyDataset,

    #[error("dataset has no column {0:?}")]
    MissingColumn(String),

    #[error("dataset rows carry no parsed timestamps")]
    NoTimestamps,
}

/// A pre-fitted performance estimator.
pub trait Estimator: std::fmt::Debug {
    /// Kind tag, matching the bundle `kind` field.
    fn kind(&self) -> &str;

    /// Score a dataset.
    fn estimate(&self, dataset: &Dataset) -> Result<EstimationResult, EstimateError>;
}
