//! Event filter - key-path matching over records
//!
//! Selects records (or whole transactions) by the value found at a dotted
//! key path.
//!
//! # Semantics
//!
//! | Criterion | Absent / `null` | Present |
//! |-----------|-----------------|---------|
//! | `Literal(v)` | matches only if `v` is `null` | structural equality |
//! | `Predicate(f)` | `f(None)` | `f(Some(value))` |
//! | `Pattern(re)` | never | `re` searched in the value's text |
//!
//! A value's text is the string itself for JSON strings and compact JSON
//! for everything else: `true`, `42`, `{"a":1}`. Patterns written against
//! other renderings, such as `True` or `{'a': 1}`, do not match.
//!
//! Raw records have no keys, so every lookup on them is absent. A
//! transaction matches when any of its records matches.
//!
//! # Example
//!
//! ```ignore
//! // Transactions that hit an error anywhere
//! let filter = EventFilter::present("error");
//! for tx in transactions.filter(|tx| filter.matches_transaction(tx)) {
//!     writer.write_transaction(&tx)?;
//! }
//! ```

mod criterion;

pub use criterion::{MatchCriterion, Predicate};

use vaudit_protocol::{Record, Transaction, Value};

use crate::TransformResult;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Match one record against a key path and criterion
///
/// Pure function of its inputs; see the module docs for the rules.
pub fn matches(record: &Record, key_path: &str, criterion: &MatchCriterion) -> bool {
    criterion.evaluate(record.lookup(key_path))
}

/// A key path paired with a criterion
#[derive(Debug, Clone)]
pub struct EventFilter {
    key: String,
    criterion: MatchCriterion,
}

impl EventFilter {
    /// Create a filter from a key path and criterion
    pub fn new(key: impl Into<String>, criterion: MatchCriterion) -> Self {
        Self {
            key: key.into(),
            criterion,
        }
    }

    /// Match records whose value at `key` equals `value`
    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, MatchCriterion::literal(value))
    }

    /// Match records for which `f` returns true
    pub fn predicate<F>(key: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self::new(key, MatchCriterion::predicate(f))
    }

    /// Match records whose value at `key` contains a regex match
    pub fn pattern(key: impl Into<String>, pattern: &str) -> TransformResult<Self> {
        Ok(Self::new(key, MatchCriterion::pattern(pattern)?))
    }

    /// Match records that carry a non-null value at `key`
    pub fn present(key: impl Into<String>) -> Self {
        Self::predicate(key, |v| v.is_some())
    }

    /// Match records with no value (or `null`) at `key`
    pub fn absent(key: impl Into<String>) -> Self {
        Self::predicate(key, |v| v.is_none())
    }

    /// The dotted key path
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The criterion
    pub fn criterion(&self) -> &MatchCriterion {
        &self.criterion
    }

    /// Check a single record
    #[inline]
    pub fn matches(&self, record: &Record) -> bool {
        matches(record, &self.key, &self.criterion)
    }

    /// Check whether any record in a sequence matches
    pub fn matches_any<'a, I>(&self, records: I) -> bool
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().any(|record| self.matches(record))
    }

    /// Check whether any record of a transaction matches
    pub fn matches_transaction(&self, tx: &Transaction) -> bool {
        self.matches_any(tx.records())
    }
}
