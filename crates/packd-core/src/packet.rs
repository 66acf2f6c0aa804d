// ABOUTME: Defines the immutable Packet record and structured path lookup into its payload.
// ABOUTME: Path walks tolerate out-of-range indices by default; a strict variant raises uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by key lookups against a packet payload or the named store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
}

/// One step of a walk into a packet payload: a mapping key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// A lookup path into a packet payload: either a single top-level key or an
/// ordered walk descending one step per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPath {
    Key(String),
    Walk(Vec<PathStep>),
}

impl DataPath {
    /// Convenience constructor for a single-key path.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

/// An immutable record observed by the host: the caller identity, the floored
/// unix second it arrived, and the structured payload itself. Source and
/// timestamp are stamped by the store at append time, never by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    source: String,
    timestamp: i64,
    data: Value,
}

impl Packet {
    pub(crate) fn new(source: String, timestamp: i64, data: Value) -> Self {
        Self {
            source,
            timestamp,
            data,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Look up a value inside the payload.
    ///
    /// A single `Key` path fails with `KeyNotFound` when the key is absent.
    /// A `Walk` descends one step per element: an out-of-range `Index` into
    /// an array yields `Ok(None)`, while a missing `Key` at any depth (or a
    /// step against an incompatible node) is a hard `KeyNotFound`. Only the
    /// out-of-range-index case is tolerated; `get_data_strict` raises for
    /// that case too.
    pub fn get_data(&self, path: &DataPath) -> Result<Option<&Value>, LookupError> {
        self.walk(path, false)
    }

    /// Like `get_data`, but an out-of-range array index is also an error.
    pub fn get_data_strict(&self, path: &DataPath) -> Result<Option<&Value>, LookupError> {
        self.walk(path, true)
    }

    fn walk(&self, path: &DataPath, strict: bool) -> Result<Option<&Value>, LookupError> {
        match path {
            DataPath::Key(key) => match self.data.get(key) {
                Some(value) => Ok(Some(value)),
                None => Err(LookupError::KeyNotFound(key.clone())),
            },
            DataPath::Walk(steps) => {
                let mut node = &self.data;
                for step in steps {
                    node = match step {
                        PathStep::Key(key) => node
                            .get(key)
                            .ok_or_else(|| LookupError::KeyNotFound(key.clone()))?,
                        PathStep::Index(index) => match node {
                            Value::Array(items) => match items.get(*index) {
                                Some(value) => value,
                                None if strict => {
                                    return Err(LookupError::KeyNotFound(index.to_string()));
                                }
                                None => return Ok(None),
                            },
                            // An index step only applies to arrays; anything
                            // else is a hard lookup failure.
                            _ => return Err(LookupError::KeyNotFound(index.to_string())),
                        },
                    };
                }
                Ok(Some(node))
            }
        }
    }
}
