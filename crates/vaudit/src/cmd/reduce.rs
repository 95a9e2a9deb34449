//! Reduce command - keep successful responses, projected to a few fields
//!
//! A record is kept when its `type` is `response` and it has no `error`.
//! Each kept record is rewritten as a flat object; missing fields become
//! `null`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vaudit_config::{Config, WriteMode};
use vaudit_protocol::{FINAL_TYPE, Map, Record, Value};
use vaudit_sinks::{LogWriter, RecordSink};
use vaudit_transform::EventFilter;

use super::{open_reader, writer_config};

#[cfg(test)]
#[path = "reduce_test.rs"]
mod tests;

/// Output field and the key path it is taken from
const PROJECTION: &[(&str, &str)] = &[
    ("time", "time"),
    ("type", "type"),
    ("request_id", "request.id"),
    ("auth_entity_id", "auth.entity_id"),
    ("auth_client_token", "auth.client_token"),
    ("namespace", "request.namespace.path"),
    ("mount_type", "request.mount_type"),
    ("request_path", "request.path"),
];

/// Reduce command arguments
#[derive(Args, Debug)]
pub struct ReduceArgs {
    /// Source log
    #[arg(value_name = "SRC")]
    src: PathBuf,

    /// Destination file (overwritten)
    #[arg(value_name = "DST")]
    dst: PathBuf,
}

/// Selects and projects records
pub(crate) struct Reducer {
    is_response: EventFilter,
    no_error: EventFilter,
}

impl Reducer {
    pub(crate) fn new() -> Self {
        Self {
            is_response: EventFilter::equals("type", FINAL_TYPE),
            no_error: EventFilter::absent("error"),
        }
    }

    /// Project a record if it is kept
    pub(crate) fn reduce(&self, record: &Record) -> Option<Record> {
        if !(self.is_response.matches(record) && self.no_error.matches(record)) {
            return None;
        }

        let mut projected = Map::with_capacity(PROJECTION.len());
        for (field, path) in PROJECTION {
            let value = record.lookup(path).cloned().unwrap_or(Value::Null);
            projected.insert((*field).to_string(), value);
        }
        Some(Record::structured(Value::Object(projected)))
    }
}

/// Run the reduce command
pub fn run(args: ReduceArgs, config: &Config) -> Result<()> {
    execute(&args, config)?;
    println!(
        "Wrote entries from {} to {}",
        args.src.display(),
        args.dst.display()
    );
    Ok(())
}

pub(crate) fn execute(args: &ReduceArgs, config: &Config) -> Result<u64> {
    let reducer = Reducer::new();
    let reader = open_reader(&args.src, config)?;
    let mut writer = LogWriter::create(&args.dst, &writer_config(config, WriteMode::Truncate))
        .with_context(|| format!("failed to open {}", args.dst.display()))?;

    let mut seen = 0u64;
    for record in reader {
        let record = record.with_context(|| format!("failed to read {}", args.src.display()))?;
        seen += 1;
        if let Some(reduced) = reducer.reduce(&record) {
            writer
                .write(&reduced)
                .with_context(|| format!("failed to write {}", args.dst.display()))?;
        }
    }

    let kept = writer.metrics().records_written;
    writer
        .close()
        .with_context(|| format!("failed to finish {}", args.dst.display()))?;

    tracing::info!(records = seen, kept, "reduce complete");
    Ok(kept)
}
