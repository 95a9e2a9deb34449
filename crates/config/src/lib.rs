//! vaudit Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Every section is optional; an empty file is a valid configuration.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use vaudit_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[writer]\ntime_key = \"ts\"").unwrap();
//! assert_eq!(config.writer.time_key, "ts");
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [grouping]
//! final_types = ["response"]
//!
//! [writer]
//! time_key = "time"
//! mode = "truncate"
//! compression = "auto"   # auto | none | lz4 | gzip
//! ```

mod compression;
mod error;
mod grouping;
mod logging;
mod reader;
mod validation;
mod writer;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use compression::Compression;
pub use error::{ConfigError, Result};
pub use grouping::GroupingConfig;
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use reader::{DEFAULT_READ_BUFFER_SIZE, ReaderConfig};
pub use writer::{DEFAULT_WRITE_BUFFER_SIZE, WriteMode, WriterConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Record reader settings
    pub reader: ReaderConfig,

    /// Transaction grouping settings
    pub grouping: GroupingConfig,

    /// Record writer settings
    pub writer: WriterConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
