//! Record reader configuration

use serde::Deserialize;

use crate::Compression;

/// Default read buffer size (32KB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 32 * 1024;

/// Reader configuration
///
/// # Example
///
/// ```toml
/// [reader]
/// buffer_size = 65536
/// compression = "gzip"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Read buffer size in bytes
    /// Default: 32KB
    pub buffer_size: usize,

    /// Input compression; `auto` also sniffs the leading magic bytes
    /// Default: auto
    pub compression: Compression,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_READ_BUFFER_SIZE,
            compression: Compression::Auto,
        }
    }
}
