// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for configuration resolution.
//!
//! Structural errors (a component configuration cannot be formed at all) are
//! represented by [`ConfigError`] and abort resolution. Semantic errors (a
//! well-formed configuration has bad field values) are represented by
//! [`ValidationError`] and collected into a [`ValidationReport`] instead.

use crate::domain::{ComponentID, Kind};
use std::fmt;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use colcfg::domain::errors::ConfigError;
///
/// let error = ConfigError::InvalidIdentifier {
///     raw: String::new(),
///     reason: "id must not be empty".to_string(),
/// };
/// assert_eq!(error.to_string(), "invalid component id \"\": id must not be empty");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A raw component key could not be parsed into a [`ComponentID`].
    #[error("invalid component id {raw:?}: {reason}")]
    InvalidIdentifier {
        /// The offending raw key
        raw: String,
        /// Why the key was rejected
        reason: String,
    },

    /// No factory is registered for the component type within its kind.
    #[error("unknown {kind} type: {component_type:?} for id: {id:?} (valid values: {available:?})")]
    UnknownComponentType {
        /// The kind whose registry was consulted
        kind: Kind,
        /// The type name that was not found
        component_type: String,
        /// The full identifier as declared
        id: String,
        /// Registered type names for the kind, sorted
        available: Vec<String>,
    },

    /// A raw sub-document does not match the shape of its target configuration.
    #[error("'{scope}' {message}")]
    Decode {
        /// Where in the document the failure occurred (e.g. `exporters::otlp`)
        scope: String,
        /// The error message
        message: String,
        /// The underlying decoding error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A structural error within one top-level section of the document.
    #[error("error reading configuration for {section:?}: {source}")]
    Section {
        /// The top-level section name (e.g. `receivers`)
        section: String,
        /// The structural error raised inside that section
        #[source]
        source: Box<ConfigError>,
    },

    /// Two factories with the same type were registered for one kind.
    #[error("duplicate {kind} factory {component_type:?}")]
    DuplicateFactory {
        /// The kind being registered
        kind: Kind,
        /// The duplicated type name
        component_type: String,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A variable reference in the document names an illegal variable.
    #[error("environment variable {name:?} has invalid name: must match regex {pattern}")]
    InvalidVariable {
        /// The variable name as written
        name: String,
        /// The pattern legal names must match
        pattern: String,
    },

    /// The resolved settings failed semantic validation.
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a decode error without an underlying cause.
    pub fn decode(scope: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Decode {
            scope: scope.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a structural error with the top-level section it occurred in.
    pub fn in_section(section: impl Into<String>, err: ConfigError) -> Self {
        ConfigError::Section {
            section: section.into(),
            source: Box::new(err),
        }
    }

    /// Returns the innermost error, looking through [`ConfigError::Section`] wrappers.
    pub fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Section { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if this error aborts resolution (anything but a validation report).
    pub fn is_structural(&self) -> bool {
        !matches!(self, ConfigError::Validation(_))
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A semantic error in an otherwise well-formed configuration.
///
/// Leaf configurations return this from their `validate` method. The message
/// always names the offending field when one is known.
///
/// # Examples
///
/// ```
/// use colcfg::domain::ValidationError;
///
/// let err = ValidationError::field("timeout", "must be greater than zero");
/// assert_eq!(err.to_string(), "timeout must be greater than zero");
/// assert_eq!(err.field_name(), Some("timeout"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    field: Option<String>,
    message: String,
}

impl ValidationError {
    /// Creates an error that is not tied to a single field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Creates an error naming the offending field.
    pub fn field(field: impl Into<String>, problem: impl fmt::Display) -> Self {
        let field = field.into();
        Self {
            message: format!("{} {}", field, problem),
            field: Some(field),
        }
    }

    /// Returns the offending field, if any.
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the full message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Where a validation failure was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A component section of the given kind.
    Component(Kind),
    /// The service/topology section.
    Service,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Component(kind) => f.write_str(kind.section()),
            Scope::Service => f.write_str("service"),
        }
    }
}

/// One entry in a [`ValidationReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The section the failure belongs to
    pub scope: Scope,
    /// The failing component, if the failure is attributable to one
    pub id: Option<ComponentID>,
    /// What is wrong
    pub error: ValidationError,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}::{}: {}", self.scope, id, self.error),
            None => write!(f, "{}: {}", self.scope, self.error),
        }
    }
}

/// Every semantic failure found in one validation pass.
///
/// # Examples
///
/// ```
/// use colcfg::domain::{Kind, Scope, ValidationError, ValidationFailure, ValidationReport};
///
/// let report = ValidationReport::new(vec![ValidationFailure {
///     scope: Scope::Component(Kind::Processor),
///     id: Some("batch".parse().unwrap()),
///     error: ValidationError::field("timeout", "must be greater than zero"),
/// }]);
/// assert!(report.to_string().contains("processors::batch: timeout must be greater than zero"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
pub struct ValidationReport {
    entries: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Creates a report from collected failures.
    pub fn new(entries: Vec<ValidationFailure>) -> Self {
        Self { entries }
    }

    /// Returns every failure, in the order they were found.
    pub fn entries(&self) -> &[ValidationFailure] {
        &self.entries
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the failures attributed to the given component.
    pub fn for_component<'a>(
        &'a self,
        scope: Scope,
        id: &'a ComponentID,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.entries
            .iter()
            .filter(move |f| f.scope == scope && f.id.as_ref() == Some(id))
    }

    /// Converts the report into a `Result`, succeeding when it is empty.
    pub fn into_result(self) -> std::result::Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {} error(s)", self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n  - {}", entry)?;
        }
        Ok(())
    }
}
