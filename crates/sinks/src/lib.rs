//! vaudit - Sinks
//!
//! Record writers and time-ordered transaction output.
//!
//! # Architecture
//!
//! ```text
//! [Record] → [encode_line] → [ChainWrite: buffer (+ LZ4 | gzip)] → [File / stream]
//!
//! [Transaction]* → [TransactionWriter: sort + k-way merge] → [RecordSink]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vaudit_sinks::{LogWriter, RecordSink, TransactionWriter};
//!
//! let mut writer = TransactionWriter::create("merged.jsonl", &config.writer)?;
//! writer.write_transactions(transactions)?;
//! writer.close()?;
//! ```

mod error;
mod log_writer;
mod metrics;
mod sink;
pub mod transaction;
pub mod util;

pub use error::{Result, SinkError};
pub use log_writer::LogWriter;
pub use metrics::WriterMetrics;
pub use sink::RecordSink;
pub use transaction::{MergeEntry, TransactionWriter, sort_by_time, time_sort_key};
