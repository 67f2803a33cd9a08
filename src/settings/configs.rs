// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resolved configurations of one component kind.

use crate::domain::conf::value_kind;
use crate::domain::{ComponentID, ConfigError, Kind, Result, ValidationError};
use crate::ports::ComponentConfig;
use crate::settings::factories::FactoryMap;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Every declared component of one kind, keyed by identifier.
///
/// Built by [`Configs::resolve`] from one top-level section of the document.
/// Iteration is ordered by identifier.
///
/// # Examples
///
/// ```
/// use colcfg::components::{BatchProcessorFactory, BatcherConfig};
/// use colcfg::domain::{ComponentID, Kind};
/// use colcfg::settings::{Configs, Factories};
///
/// let factories = Factories::builder()
///     .processor(BatchProcessorFactory)
///     .build()
///     .unwrap();
/// let section: serde_yaml::Value =
///     serde_yaml::from_str("batch/fast:\n  flush_timeout: 10ms\n").unwrap();
///
/// let configs = Configs::resolve(
///     Kind::Processor,
///     Some(&section),
///     factories.get(Kind::Processor),
/// )
/// .unwrap();
/// let batch = configs
///     .get_as::<BatcherConfig>(&ComponentID::with_name("batch", "fast"))
///     .unwrap();
/// assert_eq!(batch.flush_timeout.as_millis(), 10);
/// ```
#[derive(Debug)]
pub struct Configs {
    kind: Kind,
    entries: BTreeMap<ComponentID, Box<dyn ComponentConfig>>,
}

impl Configs {
    /// Creates an empty set for the given kind.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Resolves one top-level section.
    ///
    /// Every key is parsed into a [`ComponentID`], its factory is looked up in
    /// `factories`, and its body is decoded over the factory default. The
    /// first structural error aborts, wrapped with the section name.
    pub fn resolve(kind: Kind, raw: Option<&Value>, factories: &FactoryMap) -> Result<Self> {
        Self::resolve_section(kind, raw, factories)
            .map_err(|err| ConfigError::in_section(kind.section(), err))
    }

    fn resolve_section(kind: Kind, raw: Option<&Value>, factories: &FactoryMap) -> Result<Self> {
        let mut configs = Self::new(kind);
        let mapping = match raw {
            None | Some(Value::Null) => return Ok(configs),
            Some(Value::Mapping(mapping)) => mapping,
            Some(other) => {
                return Err(ConfigError::decode(
                    kind.section(),
                    format!("expected a map, got {}", value_kind(other)),
                ))
            }
        };

        for (key, body) in mapping {
            let raw_key = key_to_string(key)?;
            let id = ComponentID::parse(&raw_key)?;
            if configs.contains(&id) {
                return Err(ConfigError::InvalidIdentifier {
                    raw: raw_key,
                    reason: format!("duplicate component id {:?}", id.to_string()),
                });
            }
            let factory = factories.lookup(&id)?;
            let scope = format!("{}::{}", kind.section(), id);
            let config = factory.resolve(Some(body), &scope)?;
            debug!(kind = %kind, id = %id, "Resolved component configuration");
            configs.insert(id, config);
        }

        Ok(configs)
    }

    /// Adds a configuration, replacing any previous one with the same identifier.
    pub fn insert(&mut self, id: ComponentID, config: Box<dyn ComponentConfig>) {
        self.entries.insert(id, config);
    }

    /// Returns the kind of the components in this set.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no component is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the identifier is declared.
    pub fn contains(&self, id: &ComponentID) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the configuration for an identifier.
    pub fn get(&self, id: &ComponentID) -> Option<&dyn ComponentConfig> {
        self.entries.get(id).map(|c| &**c)
    }

    /// Returns the configuration for an identifier as its concrete type.
    ///
    /// `None` when the identifier is absent or the type does not match.
    pub fn get_as<T: ComponentConfig>(&self, id: &ComponentID) -> Option<&T> {
        self.get(id).and_then(|c| c.downcast_ref::<T>())
    }

    /// Iterates over every component, ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentID, &dyn ComponentConfig)> {
        self.entries.iter().map(|(id, c)| (id, &**c))
    }

    /// Iterates over the declared identifiers, in order.
    pub fn ids(&self) -> impl Iterator<Item = &ComponentID> {
        self.entries.keys()
    }

    /// Validates every component and returns all failures.
    ///
    /// One failing component never hides another.
    pub fn validate(&self) -> Vec<(ComponentID, ValidationError)> {
        self.entries
            .iter()
            .filter_map(|(id, config)| config.validate().err().map(|e| (id.clone(), e)))
            .collect()
    }
}

fn key_to_string(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::InvalidIdentifier {
            raw: format!("{:?}", other),
            reason: format!("key must be a string, got {}", value_kind(other)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BatchProcessorFactory, BatcherConfig, NopConfig, NopFactory};
    use std::sync::Arc;
    use std::time::Duration;

    fn processors() -> FactoryMap {
        let mut map = FactoryMap::new(Kind::Processor);
        map.register(Arc::new(BatchProcessorFactory)).unwrap();
        map.register(Arc::new(NopFactory)).unwrap();
        map
    }

    fn resolve(yaml: &str) -> Result<Configs> {
        let raw: Value = serde_yaml::from_str(yaml).unwrap();
        Configs::resolve(Kind::Processor, Some(&raw), &processors())
    }

    #[test]
    fn test_resolve_empty_and_null_sections() {
        let configs = Configs::resolve(Kind::Processor, None, &processors()).unwrap();
        assert!(configs.is_empty());

        let configs = resolve("~").unwrap();
        assert!(configs.is_empty());
        assert_eq!(configs.kind(), Kind::Processor);
    }

    #[test]
    fn test_resolve_merges_each_entry_over_default() {
        let configs = resolve(
            r#"
batch:
batch/big:
  max_size_items: 10000
nop:
"#,
        )
        .unwrap();
        assert_eq!(configs.len(), 3);

        let plain = configs.get_as::<BatcherConfig>(&ComponentID::new("batch")).unwrap();
        assert_eq!(plain, &BatcherConfig::default());

        let big = configs
            .get_as::<BatcherConfig>(&ComponentID::with_name("batch", "big"))
            .unwrap();
        assert_eq!(big.max_size_items, 10000);
        assert_eq!(big.flush_timeout, Duration::from_millis(200));

        assert!(configs.get(&ComponentID::new("nop")).unwrap().is::<NopConfig>());
        assert!(configs.get_as::<NopConfig>(&ComponentID::new("batch")).is_none());
    }

    #[test]
    fn test_iteration_is_ordered() {
        let configs = resolve("nop/b:\nbatch:\nnop/a:\n").unwrap();
        let ids: Vec<String> = configs.ids().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["batch", "nop/a", "nop/b"]);
    }

    #[test]
    fn test_unknown_type_is_wrapped_with_section() {
        let err = resolve("batch:\nmemory_limiter:\n").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("error reading configuration for \"processors\""));
        match err.root() {
            ConfigError::UnknownComponentType {
                kind,
                component_type,
                ..
            } => {
                assert_eq!(*kind, Kind::Processor);
                assert_eq!(component_type, "memory_limiter");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_identifier() {
        let err = resolve("\"/fast\":\n").unwrap_err();
        assert!(matches!(err.root(), ConfigError::InvalidIdentifier { .. }));

        let err = resolve("batch/:\n").unwrap_err();
        assert!(matches!(err.root(), ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_non_string_keys() {
        let mut map = FactoryMap::new(Kind::Processor);
        map.register(Arc::new(NopFactoryNamed("42"))).unwrap();
        let raw: Value = serde_yaml::from_str("42:\n").unwrap();
        let configs = Configs::resolve(Kind::Processor, Some(&raw), &map).unwrap();
        assert!(configs.contains(&ComponentID::new("42")));

        let raw: Value = serde_yaml::from_str("? [a, b]\n: {}\n").unwrap();
        let err = Configs::resolve(Kind::Processor, Some(&raw), &map).unwrap_err();
        assert!(matches!(err.root(), ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_keys_normalizing_to_the_same_id_are_rejected() {
        let err = resolve("batch:\n  min_size_items: 1\n\"batch \":\n  min_size_items: 2\n")
            .unwrap_err();
        match err.root() {
            ConfigError::InvalidIdentifier { raw, reason } => {
                assert_eq!(raw, "batch ");
                assert_eq!(reason, "duplicate component id \"batch\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut map = FactoryMap::new(Kind::Processor);
        map.register(Arc::new(NopFactoryNamed("42"))).unwrap();
        let raw: Value = serde_yaml::from_str("42:\n\"42\":\n").unwrap();
        let err = Configs::resolve(Kind::Processor, Some(&raw), &map).unwrap_err();
        assert!(matches!(err.root(), ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_non_map_section_is_decode_error() {
        let err = resolve("- batch\n").unwrap_err();
        assert!(matches!(err.root(), ConfigError::Decode { .. }));
    }

    #[test]
    fn test_decode_error_names_component() {
        let err = resolve("batch/x:\n  min_size: 3\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("processors::batch/x"), "{msg}");
        assert!(msg.contains("min_size"), "{msg}");
    }

    #[test]
    fn test_validate_visits_every_entry() {
        let configs = resolve(
            r#"
batch/a:
  min_size_items: -1
batch/b:
batch/c:
  flush_timeout: 0s
"#,
        )
        .unwrap();
        let failures = configs.validate();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0, ComponentID::with_name("batch", "a"));
        assert_eq!(failures[1].0, ComponentID::with_name("batch", "c"));
        assert_eq!(failures[1].1.field_name(), Some("timeout"));
    }

    struct NopFactoryNamed(&'static str);

    impl crate::ports::Factory for NopFactoryNamed {
        type Config = NopConfig;

        fn component_type(&self) -> &str {
            self.0
        }

        fn create_default_config(&self) -> NopConfig {
            NopConfig {}
        }
    }
}
