//! vaudit - Sources
//!
//! Readers that turn audit log files into a lazy sequence of `Record`s.
//!
//! # Format
//!
//! One record per line. JSON lines become structured records, anything
//! else is kept as a raw record, and blank lines are skipped. LZ4 and gzip
//! input is decompressed transparently, including files with several
//! frames or members from repeated appends.
//!
//! # Example
//!
//! ```ignore
//! use vaudit_sources::LogReader;
//!
//! for record in LogReader::open("audit.log")? {
//!     let record = record?;
//!     println!("{}", record);
//! }
//! ```

pub mod decode;
mod error;
mod log_reader;

pub use error::{Result, SourceError};
pub use log_reader::{LogReader, Records};
