// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `service` section: which extensions run, how components are wired into
//! pipelines, and the collector's own telemetry.

use crate::domain::{ComponentID, ConfigError, ValidationError};
use crate::ports::ComponentConfig;
use crate::settings::telemetry::{TelemetryConfig, TelemetryFactory};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// The kind of telemetry a pipeline carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// Distributed traces.
    Traces,
    /// Metrics.
    Metrics,
    /// Logs.
    Logs,
}

impl Signal {
    /// Returns the name used in pipeline identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Traces => "traces",
            Signal::Metrics => "metrics",
            Signal::Logs => "logs",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a pipeline: a signal plus an optional name (`traces/edge`).
///
/// # Examples
///
/// ```
/// use colcfg::settings::service::{PipelineID, Signal};
///
/// let id: PipelineID = "metrics/internal".parse().unwrap();
/// assert_eq!(id.signal(), Signal::Metrics);
/// assert_eq!(id.name(), "internal");
/// assert!("spans".parse::<PipelineID>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineID {
    signal: Signal,
    name: String,
}

impl PipelineID {
    /// Creates a pipeline identifier.
    pub fn new(signal: Signal, name: impl Into<String>) -> Self {
        Self {
            signal,
            name: name.into(),
        }
    }

    /// Returns the signal the pipeline carries.
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Returns the pipeline name, empty when none was given.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for PipelineID {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let id = ComponentID::parse(s)?;
        let signal = match id.component_type() {
            "traces" => Signal::Traces,
            "metrics" => Signal::Metrics,
            "logs" => Signal::Logs,
            other => {
                return Err(ConfigError::InvalidIdentifier {
                    raw: s.to_string(),
                    reason: format!(
                        "unknown signal {:?}, expected one of traces, metrics, logs",
                        other
                    ),
                })
            }
        };
        Ok(Self::new(signal, id.name()))
    }
}

impl fmt::Display for PipelineID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.signal)
        } else {
            write!(f, "{}/{}", self.signal, self.name)
        }
    }
}

impl Serialize for PipelineID {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PipelineID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The components of one pipeline, in data-flow order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Receivers (or connectors) feeding the pipeline.
    pub receivers: Vec<ComponentID>,
    /// Processors applied in order.
    pub processors: Vec<ComponentID>,
    /// Exporters (or connectors) the pipeline sends to.
    pub exporters: Vec<ComponentID>,
}

/// The `service` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Extensions to start, in order.
    pub extensions: Vec<ComponentID>,
    /// Pipelines by identifier.
    #[serde(deserialize_with = "unique_pipelines")]
    pub pipelines: BTreeMap<PipelineID, PipelineConfig>,
    /// The collector's own telemetry.
    pub telemetry: TelemetryConfig,
}

impl ServiceConfig {
    /// Creates an empty service section around the given telemetry defaults.
    pub fn with_telemetry(telemetry: TelemetryConfig) -> Self {
        Self {
            extensions: Vec::new(),
            pipelines: BTreeMap::new(),
            telemetry,
        }
    }

    /// Checks the section on its own, without looking at declared components.
    ///
    /// Unlike a leaf component, every problem is reported.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(dup) = first_duplicate(&self.extensions) {
            errors.push(ValidationError::field(
                "extensions",
                format!("references extension {:?} multiple times", dup.to_string()),
            ));
        }

        if self.pipelines.is_empty() {
            errors.push(ValidationError::new(
                "service must have at least one pipeline",
            ));
        }

        for (id, pipeline) in &self.pipelines {
            let field = format!("pipelines::{}", id);
            if pipeline.receivers.is_empty() {
                errors.push(ValidationError::field(
                    field.clone(),
                    "must have at least one receiver",
                ));
            }
            if pipeline.exporters.is_empty() {
                errors.push(ValidationError::field(
                    field.clone(),
                    "must have at least one exporter",
                ));
            }
            for (role, ids) in [
                ("receiver", &pipeline.receivers),
                ("processor", &pipeline.processors),
                ("exporter", &pipeline.exporters),
            ] {
                if let Some(dup) = first_duplicate(ids) {
                    errors.push(ValidationError::field(
                        field.clone(),
                        format!("references {} {:?} multiple times", role, dup.to_string()),
                    ));
                }
            }
        }

        if let Err(err) = self.telemetry.validate() {
            errors.push(ValidationError::field("telemetry", err));
        }

        errors
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::with_telemetry(TelemetryFactory.create_default_config())
    }
}

// Keys are trimmed like component keys, so `traces` and ` traces` collide.
fn unique_pipelines<'de, D>(deserializer: D) -> Result<BTreeMap<PipelineID, PipelineConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Pipelines;

    impl<'de> Visitor<'de> for Pipelines {
        type Value = BTreeMap<PipelineID, PipelineConfig>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of pipelines")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pipelines = BTreeMap::new();
            while let Some((id, pipeline)) = map.next_entry::<PipelineID, PipelineConfig>()? {
                if pipelines.contains_key(&id) {
                    return Err(de::Error::custom(format!(
                        "duplicate pipeline id {:?}",
                        id.to_string()
                    )));
                }
                pipelines.insert(id, pipeline);
            }
            Ok(pipelines)
        }
    }

    deserializer.deserialize_map(Pipelines)
}

fn first_duplicate(ids: &[ComponentID]) -> Option<&ComponentID> {
    let mut seen = HashSet::new();
    ids.iter().find(|id| !seen.insert(*id))
}
