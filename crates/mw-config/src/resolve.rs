//! Config file resolution and environment overrides.
//!
//! Resolution order for the monitor config path:
//! 1. `--config` CLI flag
//! 2. `MODELWATCH_CONFIG` environment variable
//! 3. XDG config directory default (`~/.config/modelwatch/monitor.json`)
//!
//! Individual `MODELWATCH_*` variables override single fields after the
//! file is parsed, which is how scheduled deployments inject per-endpoint
//! settings without templating the config file.

use crate::monitor::MonitorConfig;
use crate::validate::ValidationError;
use std::path::PathBuf;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "MODELWATCH_CONFIG";

/// Default config path under the XDG config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("modelwatch").join("monitor.json"))
}

/// Resolve the config file path: CLI flag → env var → XDG default.
pub fn resolve_config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    resolve_config_path_with(cli, |k| std::env::var(k).ok())
}

/// Resolution with an injectable env lookup.
pub fn resolve_config_path_with(
    cli: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    if let Some(path) = cli {
        return Some(path);
    }
    if let Some(path) = env(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

/// Per-field environment overrides, applied after the config file is parsed.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub capture_root: Option<String>,
    pub model_root: Option<String>,
    pub model_path: Option<String>,
    /// JSON-array string, e.g. `["f1","f2","y_pred","timestamp"]`.
    pub headers: Option<String>,
    pub timestamp_column: Option<String>,
    pub window_minutes: Option<String>,
    pub namespace: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Read overrides through an injectable lookup.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            capture_root: env("MODELWATCH_CAPTURE_ROOT"),
            model_root: env("MODELWATCH_MODEL_ROOT"),
            model_path: env("MODELWATCH_MODEL_PATH"),
            headers: env("MODELWATCH_HEADERS"),
            timestamp_column: env("MODELWATCH_TIMESTAMP_COLUMN"),
            window_minutes: env("MODELWATCH_WINDOW_MINUTES"),
            namespace: env("MODELWATCH_NAMESPACE"),
        }
    }

    /// Apply the overrides to a parsed config in place.
    pub fn apply(&self, config: &mut MonitorConfig) -> Result<(), ValidationError> {
        if let Some(v) = &self.capture_root {
            config.capture_root = v.clone();
        }
        if let Some(v) = &self.model_root {
            config.model_root = PathBuf::from(v);
        }
        if let Some(v) = &self.model_path {
            config.model_path = v.clone();
        }
        if let Some(v) = &self.headers {
            config.headers =
                serde_json::from_str(v).map_err(|e| ValidationError::EnvOverride {
                    var: "MODELWATCH_HEADERS".to_string(),
                    reason: format!("expected a JSON array of strings: {}", e),
                })?;
        }
        if let Some(v) = &self.timestamp_column {
            config.timestamp_column = v.clone();
        }
        if let Some(v) = &self.window_minutes {
            config.window_minutes = v.parse().map_err(|_| ValidationError::EnvOverride {
                var: "MODELWATCH_WINDOW_MINUTES".to_string(),
                reason: format!("expected a positive integer, got {:?}", v),
            })?;
        }
        if let Some(v) = &self.namespace {
            config.namespace = v.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::GatewayConfig;

    // ── Helper ─────────────────────────────────────────────────────

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            schema_version: "1.0.0".to_string(),
            description: None,
            capture_root: "/var/capture".to_string(),
            model_root: PathBuf::from("/var/models"),
            model_path: "m.json".to_string(),
            model_kind: "direct_loss".to_string(),
            headers: vec!["a".to_string(), "timestamp".to_string()],
            timestamp_column: "timestamp".to_string(),
            timestamp_format: "%Y-%m-%dT%H:%M:%SZ".to_string(),
            window_minutes: 10,
            namespace: "modelwatch/test".to_string(),
            dimensions: Vec::new(),
            tracked_columns: vec!["value".to_string(), "alert".to_string()],
            gateway: Some(GatewayConfig {
                endpoint: "http://localhost:9000/metrics".to_string(),
                timeout_secs: 10,
            }),
        }
    }

    // ── Path resolution ────────────────────────────────────────────

    #[test]
    fn resolve_prefers_cli_flag() {
        let path = resolve_config_path_with(Some(PathBuf::from("/tmp/cli.json")), |_| {
            Some("/tmp/env.json".to_string())
        });
        assert_eq!(path, Some(PathBuf::from("/tmp/cli.json")));
    }

    #[test]
    fn resolve_falls_back_to_env_var() {
        let path = resolve_config_path_with(None, |k| {
            assert_eq!(k, CONFIG_ENV_VAR);
            Some("/tmp/env.json".to_string())
        });
        assert_eq!(path, Some(PathBuf::from("/tmp/env.json")));
    }

    #[test]
    fn resolve_defaults_to_xdg() {
        let path = resolve_config_path_with(None, |_| None);
        if let Some(p) = path {
            assert!(p.ends_with("modelwatch/monitor.json"));
        }
    }

    // ── Env overrides ──────────────────────────────────────────────

    #[test]
    fn overrides_from_lookup_reads_all_vars() {
        let ov = EnvOverrides::from_lookup(|k| match k {
            "MODELWATCH_CAPTURE_ROOT" => Some("/data/capture".to_string()),
            "MODELWATCH_WINDOW_MINUTES" => Some("30".to_string()),
            _ => None,
        });
        assert_eq!(ov.capture_root.as_deref(), Some("/data/capture"));
        assert_eq!(ov.window_minutes.as_deref(), Some("30"));
        assert!(ov.headers.is_none());
        assert!(ov.namespace.is_none());
    }

    #[test]
    fn apply_replaces_simple_fields() {
        let ov = EnvOverrides {
            capture_root: Some("/data/capture".to_string()),
            namespace: Some("modelwatch/prod".to_string()),
            window_minutes: Some("30".to_string()),
            ..Default::default()
        };
        let mut config = test_config();
        ov.apply(&mut config).unwrap();
        assert_eq!(config.capture_root, "/data/capture");
        assert_eq!(config.namespace, "modelwatch/prod");
        assert_eq!(config.window_minutes, 30);
    }

    #[test]
    fn apply_headers_parses_json_array() {
        let ov = EnvOverrides {
            headers: Some(r#"["f1","f2","y_pred","timestamp"]"#.to_string()),
            ..Default::default()
        };
        let mut config = test_config();
        ov.apply(&mut config).unwrap();
        assert_eq!(config.headers, vec!["f1", "f2", "y_pred", "timestamp"]);
    }

    #[test]
    fn apply_headers_rejects_non_array() {
        let ov = EnvOverrides {
            headers: Some("f1,f2".to_string()),
            ..Default::default()
        };
        let mut config = test_config();
        let err = ov.apply(&mut config).unwrap_err();
        assert!(matches!(err, ValidationError::EnvOverride { ref var, .. }
            if var == "MODELWATCH_HEADERS"));
    }

    #[test]
    fn apply_window_minutes_rejects_garbage() {
        let ov = EnvOverrides {
            window_minutes: Some("soon".to_string()),
            ..Default::default()
        };
        let mut config = test_config();
        let err = ov.apply(&mut config).unwrap_err();
        assert!(matches!(err, ValidationError::EnvOverride { ref var, .. }
            if var == "MODELWATCH_WINDOW_MINUTES"));
    }

    #[test]
    fn apply_empty_overrides_is_noop() {
        let mut config = test_config();
        let before = config.headers.clone();
        EnvOverrides::default().apply(&mut config).unwrap();
        assert_eq!(config.headers, before);
        assert_eq!(config.window_minutes, 10);
    }
}
