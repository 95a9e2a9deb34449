//! Sink error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vaudit_protocol::ProtocolError;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors that can occur while writing records
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to create or open the output file
    #[error("failed to open {} for writing: {source}", path.display())]
    Create {
        /// Output path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Write, flush or finish failed
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// Record could not be serialized
    #[error("encode failed: {0}")]
    Encode(#[from] ProtocolError),

    /// Writer was already closed
    #[error("writer is closed")]
    Closed,
}

impl SinkError {
    /// Create a Create error
    pub fn create(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }

    /// Wrap an IO error
    pub fn io(source: io::Error) -> Self {
        Self::Io(source)
    }
}
