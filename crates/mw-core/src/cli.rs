//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use mw_common::OutputFormat;

/// Scheduled model performance monitoring over endpoint capture logs.
#[derive(Debug, Parser)]
#[command(name = "modelwatch", version, about)]
pub struct Cli {
    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute one monitoring run over the trailing capture window.
    Run {
        /// Monitor configuration file. Falls back to MODELWATCH_CONFIG,
        /// then the per-user default location.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Window end as RFC 3339; defaults to now.
        #[arg(long)]
        end_time: Option<DateTime<Utc>>,

        /// Override the configured window length.
        #[arg(long)]
        window_minutes: Option<u32>,

        /// Abort the run once this many seconds have elapsed.
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Log points instead of posting them to the gateway.
        #[arg(long)]
        dry_run: bool,

        /// Run summary format on stdout.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load, resolve, and validate the configuration, then exit.
    CheckConfig {
        /// Monitor configuration file. Falls back to MODELWATCH_CONFIG,
        /// then the per-user default location.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Resolved configuration format on stdout.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the configuration JSON schema.
    Schema,
}
