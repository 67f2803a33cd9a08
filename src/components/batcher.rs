// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batching thresholds.
//!
//! `BatcherConfig` bounds how telemetry is grouped before it is sent on: a
//! batch is flushed once it reaches `min_size_items` or when `flush_timeout`
//! elapses, and is split if it grows past `max_size_items`.

use crate::domain::ValidationError;
use crate::ports::{ComponentConfig, Factory};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batching threshold configuration.
///
/// # Examples
///
/// ```
/// use colcfg::components::BatcherConfig;
/// use colcfg::ports::ComponentConfig;
///
/// let mut cfg = BatcherConfig::default();
/// assert!(cfg.validate().is_ok());
///
/// cfg.min_size_items = 20001;
/// cfg.max_size_items = 20000;
/// assert_eq!(
///     cfg.validate().unwrap_err().to_string(),
///     "max_size_items must be greater than or equal to min_size_items"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatcherConfig {
    /// Whether batching is enabled.
    pub enabled: bool,

    /// Maximum time a partial batch is held before it is flushed.
    #[serde(with = "humantime_serde")]
    pub flush_timeout: Duration,

    /// Number of items that triggers a flush.
    pub min_size_items: i64,

    /// Largest batch allowed; zero means unbounded.
    pub max_size_items: i64,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flush_timeout: Duration::from_millis(200),
            min_size_items: 8192,
            max_size_items: 0,
        }
    }
}

impl ComponentConfig for BatcherConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.min_size_items < 0 {
            return Err(ValidationError::field(
                "min_size_items",
                "must be greater than or equal to zero",
            ));
        }
        if self.flush_timeout.is_zero() {
            return Err(ValidationError::field("timeout", "must be greater than zero"));
        }
        if self.max_size_items < 0 {
            return Err(ValidationError::field(
                "max_size_items",
                "must be greater than or equal to zero",
            ));
        }
        if self.max_size_items != 0 && self.max_size_items < self.min_size_items {
            return Err(ValidationError::field(
                "max_size_items",
                "must be greater than or equal to min_size_items",
            ));
        }
        Ok(())
    }
}

/// Factory for the `batch` processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchProcessorFactory;

impl Factory for BatchProcessorFactory {
    type Config = BatcherConfig;

    fn component_type(&self) -> &str {
        "batch"
    }

    fn create_default_config(&self) -> BatcherConfig {
        BatcherConfig::default()
    }
}

/// Duration serialization using humantime format.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
