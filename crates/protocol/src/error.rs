//! Protocol error types
//!
//! Decoding never fails (unparseable lines become raw records), so the only
//! errors here come from serialization.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Structured record could not be serialized as JSON
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
