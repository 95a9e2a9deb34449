//! Compression codec selection shared by readers and writers

use std::path::Path;

use serde::Deserialize;

/// Compression codec for a log file
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Pick by file extension: `.lz4`, `.gz`, or plain (default)
    #[default]
    Auto,
    /// Plain text
    None,
    /// LZ4 frames
    Lz4,
    /// gzip members
    Gzip,
}

impl Compression {
    /// Codec implied by a path's extension
    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("lz4") => Self::Lz4,
            Some("gz") => Self::Gzip,
            _ => Self::None,
        }
    }

    /// Resolve `Auto` against a path; explicit codecs are kept
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => Self::from_extension(path),
            explicit => explicit,
        }
    }

    /// Whether this is an actual compression codec
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::Lz4 | Self::Gzip)
    }
}
