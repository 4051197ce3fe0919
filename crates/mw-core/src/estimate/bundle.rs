//! Versioned model bundles with integrity verification.
//!
//! A `ModelBundle` wraps an estimator's fitted parameters with metadata
//! for versioning and integrity verification. Bundles are addressed by
//! a store root plus a relative path, which is how fitted artifacts are
//! shipped to scheduled monitors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::estimate::direct_loss::DirectLossEstimator;
use crate::estimate::Estimator;

// ── Bundle types ────────────────────────────────────────────────────────

/// A versioned model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Bundle format version (for forward-compatible schema evolution).
    pub bundle_version: String,

    /// Estimator kind tag, e.g. `direct_loss`.
    pub kind: String,

    /// Kind-specific fitted parameters.
    pub params: Value,

    /// SHA-256 hash of the JSON-serialized `params` field.
    /// Populated on bundle creation; verified on load.
    #[serde(default)]
    pub params_hash: Option<String>,

    /// ISO-8601 timestamp of bundle creation.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Errors that can occur during model bundle operations.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("params hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("unsupported bundle version: {0}")]
    UnsupportedVersion(String),

    #[error("expected estimator kind {expected}, bundle holds {actual}")]
    KindMismatch { expected: String, actual: String },

    #[error("unknown estimator kind: {0}")]
    UnknownKind(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Bundle implementation ───────────────────────────────────────────────

impl ModelBundle {
    /// Supported bundle version.
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    /// Create a bundle wrapping fitted parameters, computing the
    /// integrity hash.
    pub fn new(kind: impl Into<String>, params: Value) -> Result<Self, BundleError> {
        let params_json = serde_json::to_string(&params)?;
        let hash = sha256_hex(params_json.as_bytes());

        Ok(Self {
            bundle_version: Self::CURRENT_VERSION.to_string(),
            kind: kind.into(),
            params,
            params_hash: Some(hash),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        })
    }

    /// Parse a bundle from JSON, verifying integrity.
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        let bundle: ModelBundle = serde_json::from_str(json)?;
        bundle.verify_integrity()?;
        Ok(bundle)
    }

    /// Verify the bundle's version and integrity hash.
    pub fn verify_integrity(&self) -> Result<(), BundleError> {
        if self.bundle_version != Self::CURRENT_VERSION {
            return Err(BundleError::UnsupportedVersion(self.bundle_version.clone()));
        }

        if let Some(expected_hash) = &self.params_hash {
            let params_json = serde_json::to_string(&self.params)?;
            let actual_hash = sha256_hex(params_json.as_bytes());

            if *expected_hash != actual_hash {
                return Err(BundleError::HashMismatch {
                    expected: expected_hash.clone(),
                    actual: actual_hash,
                });
            }
        }

        Ok(())
    }

    /// Serialize the bundle to JSON.
    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Model store ─────────────────────────────────────────────────────────

/// Filesystem model store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load an estimator of the expected kind from `relative_path`.
    pub fn load(&self, relative_path: &str, kind: &str) -> Result<Box<dyn Estimator>, BundleError> {
        let path = self.root.join(relative_path);
        let content = std::fs::read_to_string(&path)?;
        let bundle = ModelBundle::from_json(&content)?;

        if bundle.kind != kind {
            return Err(BundleError::KindMismatch {
                expected: kind.to_string(),
                actual: bundle.kind.clone(),
            });
        }

        let estimator = instantiate(&bundle)?;
        tracing::debug!(
            target: "estimate.model_load",
            path = %path.display(),
            kind = %kind,
            "Loaded model bundle"
        );
        Ok(estimator)
    }

    /// Write a bundle to `relative_path`, creating parent directories.
    pub fn store(&self, relative_path: &str, bundle: &ModelBundle) -> Result<PathBuf, BundleError> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bundle.to_json()?)?;
        tracing::debug!(
            target: "estimate.model_store",
            path = %path.display(),
            kind = %bundle.kind,
            "Stored model bundle"
        );
        Ok(path)
    }
}

/// Instantiate the estimator named by a bundle's kind tag.
fn instantiate(bundle: &ModelBundle) -> Result<Box<dyn Estimator>, BundleError> {
    match bundle.kind.as_str() {
        DirectLossEstimator::KIND => {
            let estimator: DirectLossEstimator = serde_json::from_value(bundle.params.clone())?;
            Ok(Box::new(estimator))
        }
        other => Err(BundleError::UnknownKind(other.to_string())),
    }
}

/// Compute SHA-256 hex digest.
fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ── Tests ───────────────────────────────────────────────────────────────
