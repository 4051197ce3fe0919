//! Monitor configuration types.
//!
//! These types match the monitor.schema.json document emitted by the
//! `schema` subcommand.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MonitorConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Object-store prefix under which capture logs are written.
    pub capture_root: String,

    /// Root directory of the model store.
    pub model_root: PathBuf,

    /// Model artifact path, relative to `model_root`.
    pub model_path: String,

    /// Estimator kind tag expected in the model bundle.
    #[serde(default = "default_model_kind")]
    pub model_kind: String,

    /// Ordered column names for rebuilt capture rows.
    pub headers: Vec<String>,

    /// Header column parsed as the observation timestamp.
    pub timestamp_column: String,

    /// chrono format string for `timestamp_column` cells.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Trailing window length in minutes.
    pub window_minutes: u32,

    /// Metric namespace for published points.
    pub namespace: String,

    /// Dimensions attached to every published point.
    #[serde(default)]
    pub dimensions: Vec<Dimension>,

    /// Result columns forwarded to the metric sink.
    #[serde(default = "default_tracked_columns")]
    pub tracked_columns: Vec<String>,

    /// Metrics gateway endpoint. Absent is only valid for dry runs.
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
}

/// One name/value pair attached to every published point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// Metrics gateway settings for the HTTP sink.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GatewayConfig {
    /// Endpoint URL that points are POSTed to.
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_kind() -> String {
    "direct_loss".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%dT%H:%M:%SZ".to_string()
}

fn default_tracked_columns() -> Vec<String> {
    vec!["value".to_string(), "alert".to_string()]
}

fn default_gateway_timeout_secs() -> u64 {
    10
}

impl MonitorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    /// Index of the timestamp column in `headers`, if present.
    pub fn timestamp_column_index(&self) -> Option<usize> {
        self.headers.iter().position(|h| h == &self.timestamp_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Helper ─────────────────────────────────────────────────────

    fn minimal_monitor_json() -> &'static str {
        r#"{
            "schema_version": "1.0.0",
            "capture_root": "/var/capture/regression-endpoint",
            "model_root": "/var/models",
            "model_path": "regression/estimator.json",
            "headers": ["f1", "f2", "y_pred", "timestamp"],
            "timestamp_column": "timestamp",
            "window_minutes": 10,
            "namespace": "modelwatch/regression",
            "gateway": { "endpoint": "http://localhost:9000/metrics" }
        }"#
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        assert_eq!(config.schema_version, "1.0.0");
        assert_eq!(config.headers.len(), 4);
        assert_eq!(config.window_minutes, 10);
        assert_eq!(config.namespace, "modelwatch/regression");
    }

    #[test]
    fn test_defaults_applied() {
        let config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        assert_eq!(config.model_kind, "direct_loss");
        assert_eq!(config.timestamp_format, "%Y-%m-%dT%H:%M:%SZ");
        assert_eq!(config.tracked_columns, vec!["value", "alert"]);
        assert!(config.dimensions.is_empty());
        assert!(config.description.is_none());
    }

    #[test]
    fn test_gateway_timeout_default() {
        let config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        let gateway = config.gateway.unwrap();
        assert_eq!(gateway.endpoint, "http://localhost:9000/metrics");
        assert_eq!(gateway.timeout_secs, 10);
    }

    #[test]
    fn test_gateway_optional() {
        let json = r#"{
            "schema_version": "1.0.0",
            "capture_root": "/var/capture",
            "model_root": "/var/models",
            "model_path": "m.json",
            "headers": ["a", "timestamp"],
            "timestamp_column": "timestamp",
            "window_minutes": 5,
            "namespace": "modelwatch/test"
        }"#;
        let config = MonitorConfig::parse_json(json).unwrap();
        assert!(config.gateway.is_none());
    }

    #[test]
    fn test_timestamp_column_index() {
        let config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        assert_eq!(config.timestamp_column_index(), Some(3));
    }

    #[test]
    fn test_timestamp_column_index_missing() {
        let mut config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        config.timestamp_column = "nope".to_string();
        assert_eq!(config.timestamp_column_index(), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = MonitorConfig::parse_json("{not valid json}");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_headers() {
        let result = MonitorConfig::parse_json(r#"{"schema_version": "1.0.0"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_nonexistent() {
        let result = MonitorConfig::from_file(std::path::Path::new("/nonexistent/monitor.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.json");
        std::fs::write(&path, minimal_monitor_json()).unwrap();
        let config = MonitorConfig::from_file(&path).unwrap();
        assert_eq!(config.capture_root, "/var/capture/regression-endpoint");
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = MonitorConfig::parse_json(minimal_monitor_json()).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back = MonitorConfig::parse_json(&json).unwrap();
        assert_eq!(back.headers, config.headers);
        assert_eq!(back.window_minutes, config.window_minutes);
    }

    #[test]
    fn dimension_serde_roundtrip() {
        let d = Dimension {
            name: "Endpoint".to_string(),
            value: "regression-2023".to_string(),
        };
        let json = serde_json::to_string(&d).unwrap();
        let back: Dimension = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
