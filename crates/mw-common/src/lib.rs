//! modelwatch common types, IDs, and errors.
//!
//! This crate provides foundational types shared across mw-core modules:
//! - The unified error type with stable error codes
//! - Run identifiers for correlating one scheduled invocation
//! - Output format specifications for CLI commands

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, Result};
pub use id::RunId;
pub use output::OutputFormat;
