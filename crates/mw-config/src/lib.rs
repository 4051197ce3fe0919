//! modelwatch monitor configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for monitor.json
//! - Config file resolution (CLI → env → XDG default)
//! - Per-field environment overrides for scheduled deployments
//! - Schema and semantic validation

pub mod monitor;
pub mod resolve;
pub mod validate;

pub use monitor::{Dimension, GatewayConfig, MonitorConfig};
pub use resolve::{default_config_path, resolve_config_path, EnvOverrides};
pub use validate::{validate, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
