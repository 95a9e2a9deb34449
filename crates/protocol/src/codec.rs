//! Line codec
//!
//! Decoding is total: a line either parses as JSON or is kept as a raw
//! record. Encoding always produces exactly one line terminated by `\n`.

use crate::{Record, Result};

/// Decode one input line into a record
///
/// Surrounding whitespace (including the line terminator) is trimmed first.
/// Returns `None` for blank lines.
pub fn decode_line(line: &str) -> Option<Record> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(value) => Some(Record::Structured(value)),
        Err(_) => Some(Record::Raw(line.to_string())),
    }
}

/// Append one encoded line to `buf`
///
/// Structured records are written as compact JSON. Raw records are written
/// verbatim with trailing line terminators replaced by a single `\n`.
pub fn encode_line(record: &Record, buf: &mut Vec<u8>) -> Result<()> {
    match record {
        Record::Structured(value) => {
            serde_json::to_writer(&mut *buf, value)?;
        }
        Record::Raw(line) => {
            buf.extend_from_slice(line.trim_end_matches(['\n', '\r']).as_bytes());
        }
    }
    buf.push(b'\n');
    Ok(())
}
