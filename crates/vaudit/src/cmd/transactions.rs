//! Transactions command - print the transactions of a log
//!
//! Output per transaction:
//!
//! ```text
//! Transaction <id>: <n> events
//! <record>
//! ...
//! ---
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::Config;
use vaudit_transform::TryGroupTransactions;

use super::{final_types, open_reader, print_record};

#[cfg(test)]
#[path = "transactions_test.rs"]
mod tests;

/// Transactions command arguments
#[derive(Args, Debug)]
pub struct TransactionsArgs {
    /// Input log
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

/// Run the transactions command
pub fn run(args: TransactionsArgs, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    execute(&args, config, &mut out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn execute(
    args: &TransactionsArgs,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let types = final_types(config)?;
    let mut transactions = open_reader(&args.input, config)?
        .records()
        .try_transactions_with(|r| types.is_final(r));

    for tx in transactions.by_ref() {
        let tx = tx.with_context(|| format!("failed to read {}", args.input.display()))?;

        writeln!(out, "Transaction {}: {} events", tx.id(), tx.len())?;
        for record in &tx {
            print_record(out, record)?;
        }
        writeln!(out, "---")?;
    }

    let metrics = transactions.metrics();
    tracing::info!(
        records = metrics.records_received,
        skipped = metrics.records_skipped,
        finalized = metrics.transactions_finalized,
        flushed = metrics.transactions_flushed,
        "grouping complete"
    );
    Ok(())
}
