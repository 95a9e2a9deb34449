//! Filter command - select records or transactions by a key path
//!
//! # Usage
//!
//! ```bash
//! # Events carrying an error
//! vaudit filter audit.log --key error --present
//!
//! # Whole transactions of one client token, written time-ordered
//! vaudit filter audit.log --key auth.client_token --equals hmac-sha256:07d7... \
//!     --transactions --out token.jsonl
//! ```
//!
//! `--equals` takes a JSON literal (`403`, `true`, `"text"`); anything that
//! is not valid JSON is compared as a plain string.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::{Config, WriteMode};
use vaudit_protocol::Value;
use vaudit_sinks::{LogWriter, RecordSink, TransactionWriter};
use vaudit_transform::{EventFilter, TryGroupTransactions};

use super::{final_types, open_reader, print_record, writer_config};

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

/// Filter command arguments
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input log
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Dotted key path to test (`auth.client_token`)
    #[arg(long, short)]
    key: String,

    #[command(flatten)]
    criterion: CriterionArgs,

    /// Match whole transactions (any record matching selects it)
    #[arg(long, short)]
    transactions: bool,

    /// Write matches to a file instead of printing them (overwritten)
    #[arg(long, short)]
    out: Option<PathBuf>,
}

/// Exactly one criterion
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CriterionArgs {
    /// Value equals this JSON literal (or plain string)
    #[arg(long, value_name = "VALUE")]
    equals: Option<String>,

    /// Value's text contains a match of this regex
    #[arg(long, value_name = "REGEX")]
    regex: Option<String>,

    /// Key is present and not null
    #[arg(long)]
    present: bool,

    /// Key is absent or null
    #[arg(long)]
    absent: bool,
}

/// Parse an `--equals` argument
pub(crate) fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Build the event filter described by the arguments
pub(crate) fn build_filter(key: &str, criterion: &CriterionArgs) -> Result<EventFilter> {
    if let Some(raw) = &criterion.equals {
        return Ok(EventFilter::equals(key, parse_literal(raw)));
    }
    if let Some(pattern) = &criterion.regex {
        return EventFilter::pattern(key, pattern).context("invalid --regex");
    }
    if criterion.absent {
        return Ok(EventFilter::absent(key));
    }
    Ok(EventFilter::present(key))
}

/// Run the filter command
pub fn run(args: FilterArgs, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    execute(&args, config, &mut out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn execute(args: &FilterArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let filter = build_filter(&args.key, &args.criterion)?;

    match (args.transactions, &args.out) {
        (false, None) => print_events(args, config, &filter, out),
        (false, Some(path)) => {
            let written = write_events(args, config, &filter, path)?;
            writeln!(out, "Wrote {} matching events to {}", written, path.display())?;
            Ok(())
        }
        (true, None) => print_transactions(args, config, &filter, out),
        (true, Some(path)) => {
            let written = write_transactions(args, config, &filter, path)?;
            writeln!(
                out,
                "Wrote {} matching transactions to {}",
                written,
                path.display()
            )?;
            Ok(())
        }
    }
}

fn print_events(
    args: &FilterArgs,
    config: &Config,
    filter: &EventFilter,
    out: &mut impl Write,
) -> Result<()> {
    for record in open_reader(&args.input, config)? {
        let record = record.with_context(|| format!("failed to read {}", args.input.display()))?;
        if filter.matches(&record) {
            print_record(out, &record)?;
        }
    }
    Ok(())
}

fn write_events(
    args: &FilterArgs,
    config: &Config,
    filter: &EventFilter,
    path: &Path,
) -> Result<u64> {
    let mut writer = LogWriter::create(path, &writer_config(config, WriteMode::Truncate))
        .with_context(|| format!("failed to open {}", path.display()))?;

    for record in open_reader(&args.input, config)? {
        let record = record.with_context(|| format!("failed to read {}", args.input.display()))?;
        if filter.matches(&record) {
            writer
                .write(&record)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    let written = writer.metrics().records_written;
    writer
        .close()
        .with_context(|| format!("failed to finish {}", path.display()))?;
    Ok(written)
}

fn print_transactions(
    args: &FilterArgs,
    config: &Config,
    filter: &EventFilter,
    out: &mut impl Write,
) -> Result<()> {
    let types = final_types(config)?;
    let transactions = open_reader(&args.input, config)?
        .records()
        .try_transactions_with(|r| types.is_final(r));

    for tx in transactions {
        let tx = tx.with_context(|| format!("failed to read {}", args.input.display()))?;
        if !filter.matches_transaction(&tx) {
            continue;
        }

        writeln!(out, "Transaction {}:", tx.id())?;
        for record in tx.iter().filter(|r| filter.matches(r)) {
            print_record(out, record)?;
        }
    }
    Ok(())
}

fn write_transactions(
    args: &FilterArgs,
    config: &Config,
    filter: &EventFilter,
    path: &Path,
) -> Result<u64> {
    let types = final_types(config)?;
    let transactions = open_reader(&args.input, config)?
        .records()
        .try_transactions_with(|r| types.is_final(r));

    let mut writer = TransactionWriter::create(path, &writer_config(config, WriteMode::Truncate))
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut written = 0;
    for tx in transactions {
        let tx = tx.with_context(|| format!("failed to read {}", args.input.display()))?;
        if filter.matches_transaction(&tx) {
            writer
                .write_transaction(&tx)
                .with_context(|| format!("failed to write {}", path.display()))?;
            written += 1;
        }
    }

    writer
        .close()
        .with_context(|| format!("failed to finish {}", path.display()))?;
    Ok(written)
}
