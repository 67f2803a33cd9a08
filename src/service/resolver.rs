// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration resolver service.
//!
//! [`ConfigResolver`] runs a full resolution pass: retrieve every source,
//! merge the documents, apply converters, assemble the settings and validate
//! them.

use crate::domain::{Conf, ConfigError, Kind, Result};
use crate::ports::{ConfigSource, Converter};
use crate::settings::{Factories, Settings};
use tracing::{debug, info};

/// Resolves a collector configuration from one or more sources.
///
/// Sources are merged in the order they were added; a later source overrides
/// keys of an earlier one. Converters run on the merged document, in order.
///
/// # Examples
///
/// ```rust
/// use colcfg::prelude::*;
/// use colcfg::components::{BatchProcessorFactory, NopFactory};
///
/// # fn main() -> Result<()> {
/// let factories = Factories::builder()
///     .receiver(NopFactory)
///     .processor(BatchProcessorFactory)
///     .exporter(NopFactory)
///     .build()?;
///
/// let doc = Conf::from_yaml(r#"
/// receivers: {nop: }
/// exporters: {nop: }
/// service:
///   pipelines:
///     traces: {receivers: [nop], exporters: [nop]}
/// "#)?;
///
/// let resolver = ConfigResolver::builder()
///     .with_source(Box::new(doc))
///     .with_factories(factories)
///     .build()?;
/// let settings = resolver.resolve()?;
/// assert_eq!(settings.receivers.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ConfigResolver {
    /// Sources, in merge order
    sources: Vec<Box<dyn ConfigSource>>,
    /// Converters, in application order
    converters: Vec<Box<dyn Converter>>,
    /// Factories for every component kind
    factories: Factories,
}

impl ConfigResolver {
    /// Creates a new resolver builder.
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// Returns the names of the configured sources, in merge order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the factory registries used for assembly.
    pub fn factories(&self) -> &Factories {
        &self.factories
    }

    /// Retrieves and merges every source, then applies the converters.
    ///
    /// This is the document [`resolve`](Self::resolve) assembles from.
    pub fn retrieve(&self) -> Result<Conf> {
        let mut conf = Conf::new();
        for source in &self.sources {
            let retrieved = source.retrieve()?;
            debug!(
                source = source.name(),
                keys = retrieved.as_mapping().len(),
                "Retrieved configuration source"
            );
            conf.merge(retrieved);
        }

        for converter in &self.converters {
            converter.convert(&mut conf)?;
            debug!(converter = converter.name(), "Applied converter");
        }

        Ok(conf)
    }

    /// Runs a full resolution pass.
    ///
    /// Returns the first structural error, or [`ConfigError::Validation`]
    /// carrying every semantic failure.
    pub fn resolve(&self) -> Result<Settings> {
        let conf = self.retrieve()?;
        let settings = Settings::resolve(&conf, &self.factories)?;
        settings.validate()?;

        info!(
            receivers = settings.configs(Kind::Receiver).len(),
            processors = settings.configs(Kind::Processor).len(),
            exporters = settings.configs(Kind::Exporter).len(),
            connectors = settings.configs(Kind::Connector).len(),
            extensions = settings.configs(Kind::Extension).len(),
            pipelines = settings.service.pipelines.len(),
            "Resolved collector configuration"
        );
        Ok(settings)
    }
}

/// Builder for constructing a [`ConfigResolver`].
///
/// # Examples
///
/// ```rust,no_run
/// use colcfg::service::ConfigResolverBuilder;
///
/// # fn main() -> colcfg::domain::Result<()> {
/// let resolver = ConfigResolverBuilder::new()
///     .with_yaml_file("/etc/otelcol/config.yaml")?
///     .with_env_expansion()
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigResolverBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    converters: Vec<Box<dyn Converter>>,
    factories: Factories,
}

impl ConfigResolverBuilder {
    /// Creates a new builder with no sources and empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration source. Later sources override earlier ones.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds a YAML file as a configuration source.
    ///
    /// Fails immediately if the file cannot be read or parsed.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::YamlFileAdapter;
        let adapter = YamlFileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds a converter. Converters run in the order they were added.
    pub fn with_converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Adds expansion of environment variable references.
    #[cfg(feature = "env")]
    pub fn with_env_expansion(self) -> Self {
        use crate::adapters::ExpandConverter;
        self.with_converter(Box::new(ExpandConverter::new()))
    }

    /// Sets the factory registries.
    pub fn with_factories(mut self, factories: Factories) -> Self {
        self.factories = factories;
        self
    }

    /// Builds the resolver. At least one source is required.
    pub fn build(self) -> Result<ConfigResolver> {
        if self.sources.is_empty() {
            return Err(ConfigError::SourceError {
                source_name: "resolver".to_string(),
                message: "no configuration source was added".to_string(),
                source: None,
            });
        }

        Ok(ConfigResolver {
            sources: self.sources,
            converters: self.converters,
            factories: self.factories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BatchProcessorFactory, BatcherConfig, NopFactory};
    use crate::domain::ComponentID;

    struct FailingSource;

    impl ConfigSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn retrieve(&self) -> Result<Conf> {
            Err(ConfigError::SourceError {
                source_name: "failing".to_string(),
                message: "unreachable".to_string(),
                source: None,
            })
        }
    }

    /// Raises negative batch sizes to zero.
    struct ClampMinSize;

    impl Converter for ClampMinSize {
        fn name(&self) -> &str {
            "clamp-min-size"
        }

        fn convert(&self, conf: &mut Conf) -> Result<()> {
            if let Some(serde_yaml::Value::Mapping(processors)) =
                conf.as_mapping_mut().get_mut("processors")
            {
                for (_, body) in processors.iter_mut() {
                    if let Some(min) = body.get_mut("min_size_items") {
                        if min.as_i64().map_or(false, |n| n < 0) {
                            *min = serde_yaml::Value::from(0);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn factories() -> Factories {
        Factories::builder()
            .receiver(NopFactory)
            .processor(BatchProcessorFactory)
            .exporter(NopFactory)
            .build()
            .unwrap()
    }

    const BASE: &str = r#"
receivers:
  nop:
processors:
  batch:
    min_size_items: 10
exporters:
  nop:
service:
  pipelines:
    traces:
      receivers: [nop]
      processors: [batch]
      exporters: [nop]
"#;

    #[test]
    fn test_build_requires_source() {
        let result = ConfigResolver::builder().with_factories(factories()).build();
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_later_source_wins() {
        let overlay = Conf::from_yaml("processors:\n  batch:\n    max_size_items: 20\n").unwrap();
        let resolver = ConfigResolver::builder()
            .with_source(Box::new(Conf::from_yaml(BASE).unwrap()))
            .with_source(Box::new(overlay))
            .with_factories(factories())
            .build()
            .unwrap();
        assert_eq!(resolver.source_names(), vec!["inline", "inline"]);

        let settings = resolver.resolve().unwrap();
        let batch = settings
            .processors
            .get_as::<BatcherConfig>(&ComponentID::new("batch"))
            .unwrap();
        assert_eq!(batch.min_size_items, 10);
        assert_eq!(batch.max_size_items, 20);
    }

    #[test]
    fn test_source_error_aborts() {
        let resolver = ConfigResolver::builder()
            .with_source(Box::new(Conf::from_yaml(BASE).unwrap()))
            .with_source(Box::new(FailingSource))
            .with_factories(factories())
            .build()
            .unwrap();
        assert!(matches!(
            resolver.resolve(),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[test]
    fn test_converters_run_before_assembly() {
        let doc = Conf::from_yaml(&BASE.replace("min_size_items: 10", "min_size_items: -5"))
            .unwrap();
        let resolver = ConfigResolver::builder()
            .with_source(Box::new(doc))
            .with_converter(Box::new(ClampMinSize))
            .with_factories(factories())
            .build()
            .unwrap();

        let conf = resolver.retrieve().unwrap();
        assert_eq!(
            conf.get("processors").unwrap()["batch"]["min_size_items"].as_i64(),
            Some(0)
        );
        assert!(resolver.resolve().is_ok());
    }

    #[test]
    fn test_validation_failures_are_reported_together() {
        let doc = Conf::from_yaml(&BASE.replace("min_size_items: 10", "min_size_items: -1"))
            .unwrap();
        let mut broken = Conf::new();
        broken.insert(
            "service",
            serde_yaml::from_str("pipelines:\n  logs:\n    receivers: [nop]\n").unwrap(),
        );

        let resolver = ConfigResolver::builder()
            .with_source(Box::new(doc))
            .with_source(Box::new(broken))
            .with_factories(factories())
            .build()
            .unwrap();

        match resolver.resolve() {
            Err(ConfigError::Validation(report)) => {
                assert_eq!(report.len(), 2, "{report}");
                assert!(!ConfigError::Validation(report).is_structural());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_env_expansion() {
        std::env::set_var("COLCFG_RESOLVER_FLUSH", "5s");
        let doc = Conf::from_yaml(&BASE.replace(
            "min_size_items: 10",
            "min_size_items: 10\n    flush_timeout: ${COLCFG_RESOLVER_FLUSH}",
        ))
        .unwrap();
        let resolver = ConfigResolver::builder()
            .with_source(Box::new(doc))
            .with_env_expansion()
            .with_factories(factories())
            .build()
            .unwrap();

        let result = resolver.resolve();
        std::env::remove_var("COLCFG_RESOLVER_FLUSH");
        let settings = result.unwrap();
        let batch = settings
            .processors
            .get_as::<BatcherConfig>(&ComponentID::new("batch"))
            .unwrap();
        assert_eq!(batch.flush_timeout, std::time::Duration::from_secs(5));
    }
}
