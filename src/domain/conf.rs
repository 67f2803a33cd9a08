// SPDX-License-Identifier: MIT OR Apache-2.0

//! The raw configuration document.
//!
//! A `Conf` is the untyped, nested, string-keyed document that resolution
//! starts from. It is produced by a parser or source adapter, optionally
//! rewritten by converters, and then handed to the settings assembler.

use crate::domain::errors::{ConfigError, Result};
use serde_yaml::{Mapping, Value};

/// An untyped configuration document.
///
/// # Examples
///
/// ```
/// use colcfg::domain::Conf;
///
/// let conf = Conf::from_yaml("receivers:\n  otlp:\n    endpoint: localhost:4317\n").unwrap();
/// assert!(conf.is_set("receivers"));
/// assert!(!conf.is_set("exporters"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conf(Mapping);

impl Conf {
    /// Creates an empty document.
    pub fn new() -> Self {
        Conf(Mapping::new())
    }

    /// Parses a document from YAML text.
    ///
    /// An empty or null document yields an empty `Conf`. A document whose top
    /// level is not a mapping is rejected.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })?;
        Self::try_from(value)
    }

    /// Returns the value stored under a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the top-level key is present, even with a null value.
    pub fn is_set(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a top-level key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(Value::String(key.into()), value)
    }

    /// Iterates over the top-level keys that are strings.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    /// Returns true if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deep-merges `other` into this document; values from `other` win.
    ///
    /// Nested mappings are merged key by key. Any other value replaces what
    /// was there.
    pub fn merge(&mut self, other: Conf) {
        merge_mappings(&mut self.0, other.0);
    }

    /// Borrows the underlying mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Mutably borrows the underlying mapping.
    pub fn as_mapping_mut(&mut self) -> &mut Mapping {
        &mut self.0
    }
}

impl From<Mapping> for Conf {
    fn from(mapping: Mapping) -> Self {
        Conf(mapping)
    }
}

impl From<Conf> for Value {
    fn from(conf: Conf) -> Self {
        Value::Mapping(conf.0)
    }
}

impl TryFrom<Value> for Conf {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(mapping) => Ok(Conf(mapping)),
            Value::Null => Ok(Conf::new()),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "top level of a configuration document must be a map, got {}",
                    value_kind(&other)
                ),
                source: None,
            }),
        }
    }
}

/// Deep-merges `overlay` onto `base`: mappings merge, anything else replaces.
pub(crate) fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => merge_mappings(base, overlay),
        (base, overlay) => *base = overlay,
    }
}

fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Short description of a value's shape, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a map",
        Value::Tagged(_) => "a tagged value",
    }
}
