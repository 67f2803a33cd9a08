// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component identifiers.
//!
//! This module provides the `ComponentID` type, which identifies one configured
//! instance of a component type. A raw key such as `otlp/secondary` names the
//! `otlp` type with the disambiguating name `secondary`.

use crate::domain::errors::{ConfigError, Result};
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separates the type from the name in a raw component key.
pub const TYPE_AND_NAME_SEPARATOR: char = '/';

/// Identifies one configured component: a type plus an optional name.
///
/// Two components of the same type can coexist only if their names differ.
/// Only the first separator in a raw key is significant, so a name may itself
/// contain the separator character.
///
/// # Examples
///
/// ```
/// use colcfg::domain::ComponentID;
///
/// let id = ComponentID::parse("otlp/secondary").unwrap();
/// assert_eq!(id.component_type(), "otlp");
/// assert_eq!(id.name(), "secondary");
/// assert_eq!(id.to_string(), "otlp/secondary");
///
/// let id = ComponentID::parse("a/b/c").unwrap();
/// assert_eq!(id.name(), "b/c");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentID {
    component_type: String,
    name: String,
}

impl ComponentID {
    /// Creates an identifier with no name.
    ///
    /// # Examples
    ///
    /// ```
    /// use colcfg::domain::ComponentID;
    ///
    /// let id = ComponentID::new("batch");
    /// assert_eq!(id.to_string(), "batch");
    /// assert!(id.name().is_empty());
    /// ```
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            name: String::new(),
        }
    }

    /// Creates an identifier with a disambiguating name.
    pub fn with_name(component_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            name: name.into(),
        }
    }

    /// Parses a raw key of the form `type` or `type/name`.
    ///
    /// Both parts are trimmed. The key must be non-empty, the type must be
    /// non-empty, and a separator must be followed by a non-empty name.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(invalid(raw, "id must not be empty"));
        }

        let (component_type, name) = match raw.split_once(TYPE_AND_NAME_SEPARATOR) {
            Some((ty, name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(invalid(
                        raw,
                        format!("the part after {} should not be empty", TYPE_AND_NAME_SEPARATOR),
                    ));
                }
                (ty.trim(), name)
            }
            None => (raw.trim(), ""),
        };

        if component_type.is_empty() {
            return Err(invalid(raw, "the type must not be empty"));
        }

        Ok(Self::with_name(component_type, name))
    }

    /// Returns the component type.
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Returns the disambiguating name, empty when none was given.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn invalid(raw: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidIdentifier {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for ComponentID {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ComponentID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.component_type)
        } else {
            write!(
                f,
                "{}{}{}",
                self.component_type, TYPE_AND_NAME_SEPARATOR, self.name
            )
        }
    }
}

impl Serialize for ComponentID {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComponentID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ComponentID::parse(&raw).map_err(de::Error::custom)
    }
}
