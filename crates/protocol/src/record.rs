//! Record - one decoded line of an audit log
//!
//! Every consumer has to handle both variants: audit logs routinely mix JSON
//! events with plain-text lines (startup banners, truncated writes).

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::{CORRELATION_KEY, TYPE_KEY};

/// One unit of input, structured or raw
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A line that parsed as JSON (object, array or scalar)
    Structured(Value),
    /// A line that did not parse, kept verbatim without its line terminator
    Raw(String),
}

impl Record {
    /// Create a structured record
    #[inline]
    pub fn structured(value: impl Into<Value>) -> Self {
        Self::Structured(value.into())
    }

    /// Create a raw record
    #[inline]
    pub fn raw(line: impl Into<String>) -> Self {
        Self::Raw(line.into())
    }

    /// Whether this record holds a JSON value
    #[inline]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// The JSON value, if structured
    #[inline]
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// The raw line, if unstructured
    #[inline]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Raw(line) => Some(line),
        }
    }

    /// Look up a dotted key path (`request.id`)
    ///
    /// Raw records never contain any key.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.as_structured().and_then(|value| lookup(value, path))
    }

    /// Look up a single top-level field (no dot splitting)
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Structured(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }

    /// Correlation id (`request.id`), only when it is a string
    pub fn correlation_id(&self) -> Option<&str> {
        self.lookup(CORRELATION_KEY).and_then(Value::as_str)
    }

    /// Event type from the top-level `type` field, only when it is a string
    pub fn event_type(&self) -> Option<&str> {
        self.field(TYPE_KEY).and_then(Value::as_str)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(value) => write!(f, "{}", value),
            Self::Raw(line) => f.write_str(line),
        }
    }
}

/// Walk a dotted key path through nested JSON objects
///
/// Returns `None` when a segment is absent or an intermediate value is not
/// an object. An explicit `null` at the end of the path is returned as-is.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Text form of a JSON value for string comparisons
///
/// Strings are returned without quotes, `null` as the empty string, and
/// everything else as compact JSON (`true`, `1.5`, `{"a":1}`).
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}
