//! modelwatch binary entry point.

use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mw_common::{Error, OutputFormat, Result, RunId};
use mw_config::{EnvOverrides, MonitorConfig};
use mw_core::cli::{Cli, Command, LogFormat};
use mw_core::estimate::ModelStore;
use mw_core::publish::{HttpGateway, LogSink, MetricSink};
use mw_core::storage::FsStore;
use mw_core::{ExitCode, Pipeline, RunBudget};

/// Logs go to stderr so stdout stays parseable run output.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Resolve, read, and env-override the monitor configuration.
/// Validation happens per command, after any CLI overrides.
fn load_config(cli_path: Option<PathBuf>) -> Result<MonitorConfig> {
    let path = mw_config::resolve_config_path(cli_path).ok_or_else(|| {
        Error::Config("no config path; pass --config or set MODELWATCH_CONFIG".to_string())
    })?;
    let mut config = MonitorConfig::from_file(&path)?;
    EnvOverrides::from_env().apply(&mut config)?;
    Ok(config)
}

fn run(
    config_path: Option<PathBuf>,
    end_time: Option<DateTime<Utc>>,
    window_minutes: Option<u32>,
    deadline_secs: Option<u64>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(minutes) = window_minutes {
        config.window_minutes = minutes;
    }
    mw_config::validate(&config)?;

    let sink: Box<dyn MetricSink> = if dry_run {
        Box::new(LogSink)
    } else {
        let gateway = config.gateway.as_ref().ok_or_else(|| {
            Error::InvalidConfig(
                "no gateway endpoint configured; use --dry-run or set gateway".to_string(),
            )
        })?;
        Box::new(HttpGateway::new(
            gateway.endpoint.clone(),
            Duration::from_secs(gateway.timeout_secs),
        ))
    };

    let budget = match deadline_secs {
        Some(secs) => RunBudget::with_limit(Duration::from_secs(secs)),
        None => RunBudget::unlimited(),
    };
    let run_id = RunId::new();
    let end = end_time.unwrap_or_else(Utc::now);
    tracing::info!(
        target: "pipeline.run",
        run_id = %run_id,
        end_time = %end,
        window_minutes = config.window_minutes,
        dry_run,
        "Starting monitoring run"
    );

    let models = ModelStore::new(config.model_root.clone());
    let pipeline = Pipeline::new(config, Box::new(FsStore::new()), models, sink);
    let summary = pipeline.run(&run_id, end, &budget)?;

    match format {
        OutputFormat::Text => {
            println!("run {} ok", summary.run_id);
            println!(
                "  window:  {} min ending {}",
                summary.window_minutes, summary.end_time
            );
            println!(
                "  files:   {} listed, {} selected",
                summary.files_listed, summary.files_selected
            );
            println!(
                "  rows:    {} dataset, {} result",
                summary.dataset_rows, summary.result_rows
            );
            println!("  points:  {} published", summary.points_published);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

fn check_config(config_path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    mw_config::validate(&config)?;

    match format {
        OutputFormat::Text => {
            println!("configuration ok");
            println!("  capture root: {}", config.capture_root);
            println!("  model:        {} ({})", config.model_path, config.model_kind);
            println!("  window:       {} min", config.window_minutes);
            println!("  namespace:    {}", config.namespace);
            match &config.gateway {
                Some(g) => println!("  gateway:      {}", g.endpoint),
                None => println!("  gateway:      none (dry-run only)"),
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn schema() -> Result<()> {
    let schema = schemars::schema_for!(MonitorConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let result = match cli.command {
        Command::Run {
            config,
            end_time,
            window_minutes,
            deadline_secs,
            dry_run,
            format,
        } => run(config, end_time, window_minutes, deadline_secs, dry_run, format),
        Command::CheckConfig { config, format } => check_config(config, format),
        Command::Schema => schema(),
    };

    match result {
        Ok(()) => exit(ExitCode::Ok.as_i32()),
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "Run failed");
            eprintln!("error: {e}");
            exit(ExitCode::from(&e).as_i32());
        }
    }
}
