//! Pre-fitted direct loss estimation.
//!
//! The fitted artifact is a linear map from the mean prediction of a
//! time chunk to an estimated loss, plus alert thresholds and the
//! reference-period chunks scored at fitting time. Analysis rows are
//! bucketed into fixed-length chunks by their observation timestamp.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::estimate::{
    EstimateError, EstimationResult, Estimator, MetricKey, MetricValue, Period, ResultRow,
};

/// One reference-period chunk carried through from fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceChunk {
    pub start: DateTime<Utc>,
    pub value: f64,
    pub alert: bool,
}

/// A pre-fitted direct loss estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectLossEstimator {
    /// Metric group for result columns, e.g. `mae`.
    pub metric: String,

    /// Dataset column holding model predictions.
    pub prediction_column: String,

    /// Fitted linear map: estimated loss = intercept + slope * mean.
    pub intercept: f64,
    pub slope: f64,

    /// Alert when the estimated loss crosses either threshold.
    pub lower_threshold: Option<f64>,
    pub upper_threshold: Option<f64>,

    /// Chunking period in minutes.
    pub chunk_minutes: u32,

    /// Reference-period chunks scored at fitting time.
    #[serde(default)]
    pub reference_chunks: Vec<ReferenceChunk>,
}

impl DirectLossEstimator {
    pub const KIND: &'static str = "direct_loss";

    /// Floor a timestamp to its chunk boundary.
    fn chunk_start(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let period = i64::from(self.chunk_minutes) * 60;
        t - Duration::seconds(t.timestamp().rem_euclid(period))
    }

    fn alert_for(&self, value: f64) -> bool {
        if let Some(upper) = self.upper_threshold {
            if value > upper {
                return true;
            }
        }
        if let Some(lower) = self.lower_threshold {
            if value < lower {
                return true;
            }
        }
        false
    }
}

impl Estimator for DirectLossEstimator {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn estimate(&self, dataset: &Dataset) -> Result<EstimationResult, EstimateError> {
        if dataset.is_empty() {
            return Err(EstimateError::EmptyDataset);
        }
        let timestamps = dataset.timestamps();
        if timestamps.is_empty() {
            return Err(EstimateError::NoTimestamps);
        }
        let predictions = dataset
            .column(&self.prediction_column)
            .ok_or_else(|| EstimateError::MissingColumn(self.prediction_column.clone()))?;

        // Bucket row indices by chunk start, in chronological order.
        let mut chunks: BTreeMap<DateTime<Utc>, Vec<usize>> = BTreeMap::new();
        for (index, t) in timestamps.iter().enumerate() {
            chunks.entry(self.chunk_start(*t)).or_default().push(index);
        }

        let columns = vec![
            MetricKey::new(&self.metric, "value"),
            MetricKey::new(&self.metric, "alert"),
        ];

        let mut rows: Vec<ResultRow> = self
            .reference_chunks
            .iter()
            .map(|chunk| ResultRow {
                period: Period::Reference,
                chunk_start: chunk.start,
                cells: vec![
                    Some(MetricValue::Float(chunk.value)),
                    Some(MetricValue::Bool(chunk.alert)),
                ],
            })
            .collect();

        for (start, members) in chunks {
            let parsed: Vec<f64> = members
                .iter()
                .filter_map(|&i| predictions[i].trim().parse::<f64>().ok())
                .collect();

            let cells = if parsed.is_empty() {
                // No usable prediction in this chunk; leave the cells
                // missing so the publisher drops the row.
                vec![None, None]
            } else {
                let mean = parsed.iter().sum::<f64>() / parsed.len() as f64;
                let value = self.intercept + self.slope * mean;
                vec![
                    Some(MetricValue::Float(value)),
                    Some(MetricValue::Bool(self.alert_for(value))),
                ]
            };

            rows.push(ResultRow {
                period: Period::Analysis,
                chunk_start: start,
                cells,
            });
        }

        Ok(EstimationResult { columns, rows })
    }
}
