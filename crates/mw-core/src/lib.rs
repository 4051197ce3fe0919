//! modelwatch core pipeline.
//!
//! One scheduled run walks the chain
//! capture index → log reader → dataset builder → estimation adapter →
//! metric publisher, orchestrated by [`pipeline::Pipeline`]. External
//! collaborators (object store, model store, metric sink) sit behind
//! traits so runs can be exercised fully in memory.

pub mod capture;
pub mod cli;
pub mod dataset;
pub mod estimate;
pub mod exit_codes;
pub mod pipeline;
pub mod publish;
pub mod storage;

pub use exit_codes::ExitCode;
pub use pipeline::{Pipeline, RunBudget, RunSummary};
