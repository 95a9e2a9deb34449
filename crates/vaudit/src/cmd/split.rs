//! Split command - one output file per key value
//!
//! Each transaction goes to the file named after the first string value
//! found at `--by` in any of its records. Transactions without one go to
//! `error_no_<last key segment>.jsonl`.
//!
//! # Usage
//!
//! ```bash
//! vaudit split audit.log by-token/ --by auth.client_token
//! vaudit split audit.log by-entity/ --by auth.entity_id --mode truncate
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use vaudit_config::{Config, WriteMode};
use vaudit_protocol::{Transaction, Value};
use vaudit_sinks::{LogWriter, TransactionWriter};
use vaudit_transform::TryGroupTransactions;

use super::{final_types, open_reader, writer_config};

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;

/// Longest file stem produced from a key value
const MAX_STEM_LEN: usize = 200;

/// Split command arguments
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input log
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory for the per-value files (created if missing)
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,

    /// Dotted key path to split by
    #[arg(long, value_name = "KEY")]
    by: String,

    /// Append to or overwrite existing files
    #[arg(long, value_enum, default_value_t = Mode::Append)]
    mode: Mode,
}

/// File mode for the per-value files
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keep existing content
    Append,
    /// Overwrite existing content
    Truncate,
}

impl From<Mode> for WriteMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Append => WriteMode::Append,
            Mode::Truncate => WriteMode::Truncate,
        }
    }
}

/// Replace characters unsafe in file names and cap the length
pub(crate) fn sanitize_file_stem(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_LEN)
        .collect()
}

/// Name of the file for transactions without a value
pub(crate) fn missing_file_name(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    format!("error_no_{}.jsonl", sanitize_file_stem(last))
}

/// First non-empty string value at `key` across a transaction
pub(crate) fn split_value<'a>(tx: &'a Transaction, key: &str) -> Option<&'a str> {
    tx.iter()
        .filter_map(|record| record.lookup(key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

/// Per-value counts in first-seen order
#[derive(Debug, Default)]
pub(crate) struct SplitSummary {
    /// (value, file name, transactions)
    pub(crate) outputs: Vec<(String, String, u64)>,
    /// Transactions without a value
    pub(crate) missing: u64,
    /// File used for transactions without a value
    pub(crate) missing_file: String,
    /// Distinct files written
    pub(crate) files: usize,
}

impl SplitSummary {
    pub(crate) fn total(&self) -> u64 {
        self.missing + self.outputs.iter().map(|(_, _, n)| n).sum::<u64>()
    }
}

/// Run the split command
pub fn run(args: SplitArgs, config: &Config) -> Result<()> {
    let summary = execute(&args, config)?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    print_summary(&summary, &args.out_dir, &mut out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn execute(args: &SplitArgs, config: &Config) -> Result<SplitSummary> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create directory {}", args.out_dir.display()))?;

    let types = final_types(config)?;
    let output_config = writer_config(config, args.mode.into());
    let transactions = open_reader(&args.input, config)?
        .records()
        .try_transactions_with(|r| types.is_final(r));

    // Keyed by file name so values that sanitize alike share one writer
    let mut writers: HashMap<String, TransactionWriter<LogWriter>> = HashMap::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summary = SplitSummary {
        missing_file: missing_file_name(&args.by),
        ..SplitSummary::default()
    };

    for tx in transactions {
        let tx = tx.with_context(|| format!("failed to read {}", args.input.display()))?;

        let file_name = match split_value(&tx, &args.by) {
            Some(value) => {
                let slot = match index.get(value) {
                    Some(&slot) => slot,
                    None => {
                        let file_name = format!("{}.jsonl", sanitize_file_stem(value));
                        summary.outputs.push((value.to_string(), file_name, 0));
                        index.insert(value.to_string(), summary.outputs.len() - 1);
                        summary.outputs.len() - 1
                    }
                };
                summary.outputs[slot].2 += 1;
                summary.outputs[slot].1.clone()
            }
            None => {
                summary.missing += 1;
                summary.missing_file.clone()
            }
        };

        if !writers.contains_key(&file_name) {
            let writer = open_output(&args.out_dir.join(&file_name), &output_config)?;
            writers.insert(file_name.clone(), writer);
        }
        if let Some(writer) = writers.get_mut(&file_name) {
            writer
                .write_transaction(&tx)
                .with_context(|| format!("failed to write {}", file_name))?;
        }
    }

    summary.files = writers.len();
    for (file_name, writer) in writers {
        writer
            .close()
            .with_context(|| format!("failed to finish {}", file_name))?;
    }

    tracing::info!(
        transactions = summary.total(),
        files = summary.files,
        "split complete"
    );
    Ok(summary)
}

fn open_output(
    path: &Path,
    config: &vaudit_config::WriterConfig,
) -> Result<TransactionWriter<LogWriter>> {
    TransactionWriter::create(path, config)
        .with_context(|| format!("failed to open {}", path.display()))
}

pub(crate) fn print_summary(
    summary: &SplitSummary,
    out_dir: &Path,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(
        out,
        "Wrote {} transactions into {} files under {}",
        summary.total(),
        summary.files,
        out_dir.display()
    )?;
    for (value, _, count) in &summary.outputs {
        writeln!(out, "- {}: {} transactions", value, count)?;
    }
    if summary.missing > 0 {
        writeln!(
            out,
            "- missing: {} transactions (written to {})",
            summary.missing, summary.missing_file
        )?;
    }
    Ok(())
}
