//! Copy command - re-serialize a log
//!
//! Structured lines come out as compact JSON; everything else is copied
//! verbatim. Compression follows the destination path and `[writer]`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::{Config, WriteMode};
use vaudit_sinks::{LogWriter, RecordSink};

use super::{open_reader, writer_config};

#[cfg(test)]
#[path = "copy_test.rs"]
mod tests;

/// Copy command arguments
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source log
    #[arg(value_name = "SRC")]
    src: PathBuf,

    /// Destination file
    #[arg(value_name = "DST")]
    dst: PathBuf,

    /// Append to the destination instead of overwriting it
    #[arg(long)]
    append: bool,
}

/// Run the copy command
pub fn run(args: CopyArgs, config: &Config) -> Result<()> {
    let count = execute(&args, config)?;
    println!(
        "Wrote {} entries from {} to {}",
        count,
        args.src.display(),
        args.dst.display()
    );
    Ok(())
}

pub(crate) fn execute(args: &CopyArgs, config: &Config) -> Result<u64> {
    let mode = if args.append {
        WriteMode::Append
    } else {
        WriteMode::Truncate
    };

    let reader = open_reader(&args.src, config)?;
    let mut writer = LogWriter::create(&args.dst, &writer_config(config, mode))
        .with_context(|| format!("failed to open {}", args.dst.display()))?;

    for record in reader {
        let record = record.with_context(|| format!("failed to read {}", args.src.display()))?;
        writer
            .write(&record)
            .with_context(|| format!("failed to write {}", args.dst.display()))?;
    }

    let count = writer.metrics().records_written;
    writer
        .close()
        .with_context(|| format!("failed to finish {}", args.dst.display()))?;
    Ok(count)
}
