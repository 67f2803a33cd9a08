// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of the top-level settings.
//!
//! [`Settings::resolve`] turns a raw document into one [`Configs`] per
//! component kind plus the decoded `service` section. Structural problems
//! abort the whole assembly; semantic problems are left for
//! [`Settings::validate`].

pub mod configs;
pub mod factories;
pub mod service;
pub mod telemetry;
pub mod validation;

pub use configs::Configs;
pub use factories::{Factories, FactoriesBuilder, FactoryMap};
pub use service::{PipelineConfig, PipelineID, ServiceConfig, Signal};
pub use telemetry::{TelemetryConfig, TelemetryFactory};
pub use validation::validate_all;

use crate::domain::decode::decode_onto;
use crate::domain::{Conf, ConfigError, Kind, Result, ValidationReport};
use serde_yaml::Value;

const SERVICE_SECTION: &str = "service";

/// The fully resolved configuration of a collector.
///
/// Immutable once built and safe to share across threads.
///
/// # Examples
///
/// ```
/// use colcfg::components::{BatchProcessorFactory, NopFactory};
/// use colcfg::domain::{Conf, Kind};
/// use colcfg::settings::{Factories, Settings};
///
/// let factories = Factories::builder()
///     .receiver(NopFactory)
///     .processor(BatchProcessorFactory)
///     .exporter(NopFactory)
///     .build()
///     .unwrap();
///
/// let doc = Conf::from_yaml(r#"
/// receivers:
///   nop:
/// processors:
///   batch:
/// exporters:
///   nop:
/// service:
///   pipelines:
///     logs:
///       receivers: [nop]
///       processors: [batch]
///       exporters: [nop]
/// "#).unwrap();
///
/// let settings = Settings::resolve(&doc, &factories).unwrap();
/// assert_eq!(settings.configs(Kind::Processor).len(), 1);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct Settings {
    /// Resolved receivers.
    pub receivers: Configs,
    /// Resolved processors.
    pub processors: Configs,
    /// Resolved exporters.
    pub exporters: Configs,
    /// Resolved connectors.
    pub connectors: Configs,
    /// Resolved extensions.
    pub extensions: Configs,
    /// The decoded `service` section.
    pub service: ServiceConfig,
}

impl Settings {
    /// Assembles settings from a raw, already expanded document.
    ///
    /// Sections are resolved in [`Kind::ALL`] order and the first structural
    /// error is returned. The telemetry defaults are produced once per call.
    pub fn resolve(doc: &Conf, factories: &Factories) -> Result<Self> {
        check_top_level_keys(doc)?;

        let section =
            |kind: Kind| Configs::resolve(kind, doc.get(kind.section()), factories.get(kind));
        let receivers = section(Kind::Receiver)?;
        let processors = section(Kind::Processor)?;
        let exporters = section(Kind::Exporter)?;
        let connectors = section(Kind::Connector)?;
        let extensions = section(Kind::Extension)?;

        let default = ServiceConfig::with_telemetry(TelemetryFactory.create_default_config());
        let service = decode_onto(default, doc.get(SERVICE_SECTION), SERVICE_SECTION)
            .map_err(|err| ConfigError::in_section(SERVICE_SECTION, err))?;

        Ok(Self {
            receivers,
            processors,
            exporters,
            connectors,
            extensions,
            service,
        })
    }

    /// Returns the configurations of one kind.
    pub fn configs(&self, kind: Kind) -> &Configs {
        match kind {
            Kind::Receiver => &self.receivers,
            Kind::Processor => &self.processors,
            Kind::Exporter => &self.exporters,
            Kind::Connector => &self.connectors,
            Kind::Extension => &self.extensions,
        }
    }

    /// Runs every semantic check and reports all failures together.
    pub fn validate(&self) -> std::result::Result<(), ValidationReport> {
        validate_all(self)
    }
}

fn check_top_level_keys(doc: &Conf) -> Result<()> {
    let unknown: Vec<String> = doc
        .as_mapping()
        .keys()
        .filter(|key| {
            key.as_str().map_or(true, |k| {
                k != SERVICE_SECTION && Kind::from_section(k).is_none()
            })
        })
        .map(|key| match key {
            Value::String(s) => s.clone(),
            other => format!("{:?}", other),
        })
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::decode(
            "",
            format!("has invalid keys: {}", unknown.join(", ")),
        ))
    }
}
