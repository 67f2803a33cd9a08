// SPDX-License-Identifier: MIT OR Apache-2.0

//! The collector's own telemetry settings.
//!
//! These live under `service::telemetry` and describe how the collector
//! reports on itself. Their defaults come from [`TelemetryFactory`], which is
//! invoked once per resolution pass.

use crate::domain::ValidationError;
use crate::ports::ComponentConfig;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Severity threshold for the collector's own logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including debug output.
    Debug,
    /// Informational messages and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

/// Output format of the collector's own logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    /// Human readable lines.
    #[default]
    Console,
    /// One JSON object per line.
    Json,
}

/// Verbosity of the collector's own metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsLevel {
    /// No internal metrics.
    None,
    /// Essential metrics only.
    #[default]
    Basic,
    /// Adds metrics useful for everyday operation.
    Normal,
    /// Every available metric.
    Detailed,
}

/// Log settings of the collector itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogsConfig {
    /// Minimum level that is emitted.
    pub level: LogLevel,
    /// Development mode: stack traces on warnings and more verbose output.
    pub development: bool,
    /// Output format.
    pub encoding: LogEncoding,
    /// Where log lines are written.
    pub output_paths: Vec<String>,
    /// Where internal logger errors are written.
    pub error_output_paths: Vec<String>,
    /// Fields added to every log line.
    pub initial_fields: BTreeMap<String, Value>,
}

/// Metric settings of the collector itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Which metrics are produced.
    pub level: MetricsLevel,
    /// Address the metrics endpoint listens on.
    pub address: String,
}

/// The `service::telemetry` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Log settings.
    pub logs: LogsConfig,
    /// Metric settings.
    pub metrics: MetricsConfig,
    /// Resource attributes describing the collector; a null value removes a
    /// default attribute.
    pub resource: BTreeMap<String, Option<String>>,
}

impl ComponentConfig for TelemetryConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.metrics.level != MetricsLevel::None && self.metrics.address.trim().is_empty() {
            return Err(ValidationError::field(
                "metrics::address",
                "must be set when metrics level is not none",
            ));
        }
        Ok(())
    }
}

/// Produces the default telemetry section.
///
/// This is the single fixed factory of the telemetry section: a pure function
/// with no shared state, so every call returns an independent value.
///
/// # Examples
///
/// ```
/// use colcfg::settings::telemetry::{MetricsLevel, TelemetryFactory};
///
/// let cfg = TelemetryFactory.create_default_config();
/// assert_eq!(cfg.metrics.level, MetricsLevel::Basic);
/// assert_eq!(cfg.metrics.address, ":8888");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TelemetryFactory;

impl TelemetryFactory {
    /// Returns a fresh default telemetry section.
    pub fn create_default_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            logs: LogsConfig {
                level: LogLevel::Info,
                development: false,
                encoding: LogEncoding::Console,
                output_paths: vec!["stderr".to_string()],
                error_output_paths: vec!["stderr".to_string()],
                initial_fields: BTreeMap::new(),
            },
            metrics: MetricsConfig {
                level: MetricsLevel::Basic,
                address: ":8888".to_string(),
            },
            resource: BTreeMap::new(),
        }
    }
}
