//! Command implementations for the vaudit CLI

pub mod copy;
pub mod filter;
pub mod merge;
pub mod read;
pub mod reduce;
pub mod split;
pub mod transactions;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use vaudit_config::{Config, WriteMode, WriterConfig};
use vaudit_protocol::{Record, encode_line};
use vaudit_sources::LogReader;
use vaudit_transform::FinalTypes;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Open an input log with the `[reader]` settings
pub(crate) fn open_reader(path: &Path, config: &Config) -> Result<LogReader> {
    LogReader::open_with(path, &config.reader)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Read every record of an input log
pub(crate) fn read_records(path: &Path, config: &Config) -> Result<Vec<Record>> {
    open_reader(path, config)?
        .read_all()
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Finalization types from `[grouping]`
pub(crate) fn final_types(config: &Config) -> Result<FinalTypes> {
    FinalTypes::from_config(&config.grouping).context("invalid [grouping] section")
}

/// `[writer]` settings with the mode overridden
pub(crate) fn writer_config(config: &Config, mode: WriteMode) -> WriterConfig {
    WriterConfig {
        mode,
        ..config.writer.clone()
    }
}

/// Print one record as a line
pub(crate) fn print_record(out: &mut impl Write, record: &Record) -> Result<()> {
    let mut line = Vec::new();
    encode_line(record, &mut line)?;
    out.write_all(&line)?;
    Ok(())
}
