//! Transaction grouping configuration

use serde::Deserialize;

/// Grouping configuration
///
/// A transaction completes when a record arrives whose top-level `type`
/// matches one of `final_types` (case-insensitive).
///
/// # Example
///
/// ```toml
/// [grouping]
/// final_types = ["response"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GroupingConfig {
    /// Event types that complete a transaction
    /// Default: ["response"]
    pub final_types: Vec<String>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            final_types: vec!["response".to_string()],
        }
    }
}
