//! Record writer configuration

use serde::Deserialize;

use crate::Compression;

/// Default write buffer size (1MB)
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 1024 * 1024;

/// How an existing output file is treated
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Append to the existing file (default)
    #[default]
    Append,
    /// Truncate the existing file
    Truncate,
}

/// Writer configuration
///
/// # Example
///
/// ```toml
/// [writer]
/// time_key = "time"
/// mode = "truncate"
/// compression = "lz4"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WriterConfig {
    /// Top-level field used to order records
    /// Default: "time"
    pub time_key: String,

    /// Append or truncate
    /// Default: append
    pub mode: WriteMode,

    /// Write buffer size in bytes
    /// Default: 1MB
    pub buffer_size: usize,

    /// Output compression
    /// Default: auto
    pub compression: Compression,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            time_key: "time".to_string(),
            mode: WriteMode::Append,
            buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            compression: Compression::Auto,
        }
    }
}
