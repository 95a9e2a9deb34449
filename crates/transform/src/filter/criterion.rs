//! Match criteria
//!
//! A criterion is dispatched exactly once per lookup: literal equality,
//! a caller predicate, or a regex search over the value's text form.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use regex::Regex;
use vaudit_protocol::{Value, value_text};

use crate::{TransformError, TransformResult};

#[cfg(test)]
#[path = "criterion_test.rs"]
mod tests;

/// Caller-supplied test over a looked-up value
///
/// Receives `None` when the key is absent or explicitly `null`.
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// What a looked-up value must satisfy
#[derive(Clone)]
pub enum MatchCriterion {
    /// Structural equality; `Literal(null)` also matches an absent key
    Literal(Value),
    /// Arbitrary test; a panic inside the predicate counts as no match
    ///
    /// The panic is caught with `catch_unwind`, but the process panic hook
    /// still runs first, so the default hook prints the panic message to
    /// stderr. Install a quieter hook with `std::panic::set_hook` if that
    /// output is unwanted. Builds with `panic = "abort"` cannot recover.
    Predicate(Predicate),
    /// Regex searched anywhere in the value's text; absent never matches
    Pattern(Regex),
}

impl MatchCriterion {
    /// Create a literal criterion
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a predicate criterion
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Compile a regex criterion
    pub fn pattern(pattern: &str) -> TransformResult<Self> {
        let re = Regex::new(pattern).map_err(|e| TransformError::invalid_pattern(pattern, e))?;
        Ok(Self::Pattern(re))
    }

    /// Evaluate against a looked-up value
    ///
    /// `null` is folded into "not found" before dispatch.
    pub fn evaluate(&self, found: Option<&Value>) -> bool {
        let found = found.filter(|v| !v.is_null());

        match self {
            Self::Literal(expected) => match found {
                Some(value) => value == expected,
                None => expected.is_null(),
            },

            Self::Predicate(f) => match panic::catch_unwind(AssertUnwindSafe(|| f(found))) {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("match predicate panicked, treating as no match");
                    false
                }
            },

            Self::Pattern(re) => found.is_some_and(|value| re.is_match(&value_text(value))),
        }
    }
}

impl From<Regex> for MatchCriterion {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<Value> for MatchCriterion {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for MatchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}
