//! Source error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while reading records
///
/// Malformed lines are not errors; they are returned as raw records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to open the input file
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that could not be opened
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to read from the underlying stream
    #[error("read failed after line {line}: {source}")]
    Read {
        /// Last line successfully read (1-based, 0 before the first line)
        line: u64,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// Create an Open error
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a Read error
    pub fn read(line: u64, source: io::Error) -> Self {
        Self::Read { line, source }
    }
}
