//! Merge command - group a log and write it back in time order
//!
//! Every transaction is sorted by its time field and all of them are
//! k-way merged into one output file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::{Config, WriteMode};
use vaudit_sinks::{LogWriter, TransactionWriter};
use vaudit_transform::GroupTransactions;

use super::{final_types, read_records, writer_config};

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;

/// Merge command arguments
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Source log
    #[arg(value_name = "SRC")]
    src: PathBuf,

    /// Destination file (overwritten)
    #[arg(value_name = "DST")]
    dst: PathBuf,

    /// Top-level field holding the record timestamp [default: from config, else "time"]
    #[arg(long)]
    time_key: Option<String>,
}

/// Run the merge command
pub fn run(args: MergeArgs, config: &Config) -> Result<()> {
    execute(&args, config)?;
    println!(
        "Wrote merged transactions from {} -> {}",
        args.src.display(),
        args.dst.display()
    );
    Ok(())
}

pub(crate) fn execute(args: &MergeArgs, config: &Config) -> Result<usize> {
    let types = final_types(config)?;
    let records = read_records(&args.src, config)?;

    let time_key = args
        .time_key
        .clone()
        .unwrap_or_else(|| config.writer.time_key.clone());

    let sink = LogWriter::create(&args.dst, &writer_config(config, WriteMode::Truncate))
        .with_context(|| format!("failed to open {}", args.dst.display()))?;
    let mut writer = TransactionWriter::with_time_key(sink, time_key);

    let written = writer
        .write_transactions(records.into_iter().transactions_with(|r| types.is_final(r)))
        .with_context(|| format!("failed to write {}", args.dst.display()))?;
    writer
        .close()
        .with_context(|| format!("failed to finish {}", args.dst.display()))?;

    tracing::info!(records = written, dst = %args.dst.display(), "merge complete");
    Ok(written)
}
