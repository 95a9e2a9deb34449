//! vaudit - Audit log transaction toolkit
//!
//! # Usage
//!
//! ```bash
//! # Print every record
//! vaudit read audit.log
//!
//! # Transactions that failed, written time-ordered
//! vaudit filter audit.log --key error --present --transactions --out errors.jsonl
//!
//! # One file per client token
//! vaudit split audit.log out/ --by auth.client_token --mode truncate
//! ```

mod cmd;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};
use vaudit_config::{Config, LogConfig, LogFormat, LogOutput};

/// vaudit - Group, filter and merge audit log transactions
#[derive(Parser, Debug)]
#[command(name = "vaudit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record of a log
    Read(cmd::read::ReadArgs),

    /// Re-serialize a log into another file
    Copy(cmd::copy::CopyArgs),

    /// Print the transactions of a log
    Transactions(cmd::transactions::TransactionsArgs),

    /// Select records or transactions by a key path
    Filter(cmd::filter::FilterArgs),

    /// Merge all transactions into one time-ordered file
    Merge(cmd::merge::MergeArgs),

    /// Keep successful responses, projected to a few fields
    Reduce(cmd::reduce::ReduceArgs),

    /// Split transactions into one file per key value
    Split(cmd::split::SplitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&log_level, &config.log)?;

    match cli.command {
        Command::Read(args) => cmd::read::run(args, &config),
        Command::Copy(args) => cmd::copy::run(args, &config),
        Command::Transactions(args) => cmd::transactions::run(args, &config),
        Command::Filter(args) => cmd::filter::run(args, &config),
        Command::Merge(args) => cmd::merge::run(args, &config),
        Command::Reduce(args) => cmd::reduce::run(args, &config),
        Command::Split(args) => cmd::split::run(args, &config),
    }
}

/// Load the config file if one was given, defaults otherwise
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.log.level.as_str().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match &log.output {
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match log.format {
        LogFormat::Console => fmt::layer()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    Ok(())
}
