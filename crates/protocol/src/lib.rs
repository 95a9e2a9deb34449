//! vaudit Protocol - Core types for audit event streams
//!
//! This crate provides the types that flow through every stage:
//! - `Record` - One decoded line: structured JSON or an opaque raw string
//! - `Transaction` - Records sharing one correlation id
//! - Line codec (`decode_line`, `encode_line`) shared by readers and writers
//!
//! # Wire Format
//!
//! One value per line. A line that parses as JSON becomes
//! `Record::Structured`, anything else is kept verbatim as `Record::Raw`.
//!
//! ```
//! use vaudit_protocol::{decode_line, Record};
//!
//! let record = decode_line(r#"{"request": {"id": "abc"}, "type": "request"}"#).unwrap();
//! assert_eq!(record.correlation_id(), Some("abc"));
//!
//! let raw = decode_line("not json").unwrap();
//! assert_eq!(raw, Record::raw("not json"));
//! ```

mod codec;
mod error;
mod record;
mod transaction;

pub use codec::{decode_line, encode_line};
pub use error::ProtocolError;
pub use record::{Record, lookup, value_text};
pub use transaction::Transaction;

// Re-export the JSON value type so downstream crates agree on one version
pub use serde_json::{Map, Value};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Dotted key path holding the correlation id of a record
pub const CORRELATION_KEY: &str = "request.id";

/// Top-level field holding the event type (`request`, `response`, ...)
pub const TYPE_KEY: &str = "type";

/// Event type that completes a transaction by default
pub const FINAL_TYPE: &str = "response";

/// Top-level field used for time ordering by default
pub const DEFAULT_TIME_KEY: &str = "time";

#[cfg(test)]
mod codec_test;
