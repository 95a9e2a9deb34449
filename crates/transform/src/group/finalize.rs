//! Finalization predicates
//!
//! Decide whether a record completes its transaction.

use vaudit_config::GroupingConfig;
use vaudit_protocol::{FINAL_TYPE, Record};

use crate::{TransformError, TransformResult};

#[cfg(test)]
#[path = "finalize_test.rs"]
mod tests;

/// Default finalization rule
///
/// True iff the record's top-level `type` is a string equal to
/// `"response"`, ignoring case.
pub fn default_is_final(record: &Record) -> bool {
    record
        .event_type()
        .is_some_and(|t| t.to_lowercase() == FINAL_TYPE)
}

/// Finalization by a configured set of event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalTypes {
    types: Vec<String>,
}

impl FinalTypes {
    /// Build from a list of event types, compared case-insensitively
    pub fn new<I, S>(types: I) -> TransformResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: Vec<String> = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if types.is_empty() {
            return Err(TransformError::config("at least one final type is required"));
        }

        Ok(Self { types })
    }

    /// Build from the `[grouping]` section
    pub fn from_config(config: &GroupingConfig) -> TransformResult<Self> {
        Self::new(&config.final_types)
    }

    /// Configured types, lowercased
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Check whether a record completes its transaction
    pub fn is_final(&self, record: &Record) -> bool {
        let Some(event_type) = record.event_type() else {
            return false;
        };
        let event_type = event_type.to_lowercase();
        self.types.iter().any(|t| *t == event_type)
    }
}

impl Default for FinalTypes {
    fn default() -> Self {
        Self {
            types: vec![FINAL_TYPE.to_string()],
        }
    }
}
