//! Run identity for scheduled monitoring invocations.
//!
//! Each invocation gets a fresh `RunId` at startup; it appears in every
//! log line and in the run summary so one run's output can be correlated
//! across log aggregation and the metrics backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Run ID for one scheduled monitoring invocation.
///
/// Format: `run-<date>-<time>-<random>`
/// Example: `run-20230223-164718-a1b2c3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .to_string()
            .chars()
            .take(6)
            .collect();
        RunId(format!("run-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }

    /// Parse an existing run ID string.
    pub fn parse(s: &str) -> Option<Self> {
        if s.starts_with("run-") && s.len() > 20 {
            Some(RunId(s.to_string()))
        } else {
            None
        }
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
