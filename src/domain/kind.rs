// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component kinds.
//!
//! A collector is assembled from five structural categories of pipeline
//! participant. Each kind owns its own section of the configuration document
//! and its own factory registry.

use std::fmt;

/// The structural category of a pipeline participant.
///
/// # Examples
///
/// ```
/// use colcfg::domain::Kind;
///
/// assert_eq!(Kind::Exporter.section(), "exporters");
/// assert_eq!(Kind::Exporter.as_str(), "exporter");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// Ingests telemetry into a pipeline.
    Receiver,
    /// Transforms telemetry inside a pipeline.
    Processor,
    /// Sends telemetry out of a pipeline.
    Exporter,
    /// Joins two pipelines, acting as exporter of one and receiver of the other.
    Connector,
    /// Provides capabilities outside of any pipeline.
    Extension,
}

impl Kind {
    /// Every kind, in the order sections are resolved.
    pub const ALL: [Kind; 5] = [
        Kind::Receiver,
        Kind::Processor,
        Kind::Exporter,
        Kind::Connector,
        Kind::Extension,
    ];

    /// Returns the singular name of the kind (e.g. `receiver`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Receiver => "receiver",
            Kind::Processor => "processor",
            Kind::Exporter => "exporter",
            Kind::Connector => "connector",
            Kind::Extension => "extension",
        }
    }

    /// Returns the top-level document key holding this kind's components.
    pub fn section(&self) -> &'static str {
        match self {
            Kind::Receiver => "receivers",
            Kind::Processor => "processors",
            Kind::Exporter => "exporters",
            Kind::Connector => "connectors",
            Kind::Extension => "extensions",
        }
    }

    /// Looks up a kind by its section key.
    pub fn from_section(section: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.section() == section)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
