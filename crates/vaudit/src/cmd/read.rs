//! Read command - print every record of a log
//!
//! # Usage
//!
//! ```bash
//! vaudit read audit.log
//! vaudit read audit.log.gz | jq .type
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::Config;

use super::{open_reader, print_record};

#[cfg(test)]
#[path = "read_test.rs"]
mod tests;

/// Read command arguments
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Input log (`.lz4` and `.gz` are decompressed)
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

/// Run the read command
pub fn run(args: ReadArgs, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    execute(&args, config, &mut out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn execute(args: &ReadArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let reader = open_reader(&args.input, config)?;

    let mut count = 0u64;
    for record in reader {
        let record =
            record.with_context(|| format!("failed to read {}", args.input.display()))?;
        print_record(out, &record)?;
        count += 1;
    }

    tracing::info!(input = %args.input.display(), records = count, "read complete");
    Ok(())
}
