// SPDX-License-Identifier: MIT OR Apache-2.0

//! Factory registries.
//!
//! A [`FactoryMap`] maps type names to factories for one kind; [`Factories`]
//! holds one map per kind. Both are read-only once built.

use crate::domain::{ComponentID, ConfigError, Kind, Result};
use crate::ports::{DynFactory, Factory};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The factories registered for one component kind, keyed by type name.
#[derive(Clone)]
pub struct FactoryMap {
    kind: Kind,
    factories: HashMap<String, Arc<dyn DynFactory>>,
}

impl FactoryMap {
    /// Creates an empty map for the given kind.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            factories: HashMap::new(),
        }
    }

    /// Registers a factory, rejecting a second factory for the same type.
    pub fn register(&mut self, factory: Arc<dyn DynFactory>) -> Result<()> {
        let component_type = factory.factory_type().to_string();
        if self.factories.contains_key(&component_type) {
            return Err(ConfigError::DuplicateFactory {
                kind: self.kind,
                component_type,
            });
        }
        self.factories.insert(component_type, factory);
        Ok(())
    }

    /// Returns the kind this map serves.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the factory for a type name, if registered.
    pub fn get(&self, component_type: &str) -> Option<&dyn DynFactory> {
        self.factories.get(component_type).map(|f| &**f)
    }

    /// Looks up the factory for a component, failing with
    /// [`ConfigError::UnknownComponentType`] when its type is not registered.
    ///
    /// Matching is exact and case-sensitive.
    pub fn lookup(&self, id: &ComponentID) -> Result<&dyn DynFactory> {
        self.get(id.component_type())
            .ok_or_else(|| ConfigError::UnknownComponentType {
                kind: self.kind,
                component_type: id.component_type().to_string(),
                id: id.to_string(),
                available: self.types(),
            })
    }

    /// Returns every registered type name, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Returns the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMap")
            .field("kind", &self.kind)
            .field("types", &self.types())
            .finish()
    }
}

/// The factory registry for every component kind.
///
/// # Examples
///
/// ```rust
/// use colcfg::components::{BatchProcessorFactory, NopFactory};
/// use colcfg::domain::Kind;
/// use colcfg::settings::Factories;
///
/// let factories = Factories::builder()
///     .receiver(NopFactory)
///     .processor(BatchProcessorFactory)
///     .exporter(NopFactory)
///     .build()
///     .unwrap();
///
/// assert_eq!(factories.get(Kind::Processor).types(), vec!["batch".to_string()]);
/// assert!(factories.get(Kind::Connector).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Factories {
    receivers: FactoryMap,
    processors: FactoryMap,
    exporters: FactoryMap,
    connectors: FactoryMap,
    extensions: FactoryMap,
}

impl Factories {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            receivers: FactoryMap::new(Kind::Receiver),
            processors: FactoryMap::new(Kind::Processor),
            exporters: FactoryMap::new(Kind::Exporter),
            connectors: FactoryMap::new(Kind::Connector),
            extensions: FactoryMap::new(Kind::Extension),
        }
    }

    /// Creates a registry builder.
    pub fn builder() -> FactoriesBuilder {
        FactoriesBuilder::new()
    }

    /// Returns the map for one kind.
    pub fn get(&self, kind: Kind) -> &FactoryMap {
        match kind {
            Kind::Receiver => &self.receivers,
            Kind::Processor => &self.processors,
            Kind::Exporter => &self.exporters,
            Kind::Connector => &self.connectors,
            Kind::Extension => &self.extensions,
        }
    }

    fn get_mut(&mut self, kind: Kind) -> &mut FactoryMap {
        match kind {
            Kind::Receiver => &mut self.receivers,
            Kind::Processor => &mut self.processors,
            Kind::Exporter => &mut self.exporters,
            Kind::Connector => &mut self.connectors,
            Kind::Extension => &mut self.extensions,
        }
    }

    /// Registers a factory for a kind.
    pub fn register(&mut self, kind: Kind, factory: Arc<dyn DynFactory>) -> Result<()> {
        self.get_mut(kind).register(factory)
    }
}

impl Default for Factories {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a [`Factories`] registry.
///
/// Registration errors are deferred to [`build`](FactoriesBuilder::build) so
/// the builder can be chained.
pub struct FactoriesBuilder {
    pending: Vec<(Kind, Arc<dyn DynFactory>)>,
}

impl FactoriesBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Adds a factory for the given kind.
    pub fn with_factory<F: Factory>(mut self, kind: Kind, factory: F) -> Self {
        let factory: Arc<dyn DynFactory> = Arc::new(factory);
        self.pending.push((kind, factory));
        self
    }

    /// Adds a receiver factory.
    pub fn receiver<F: Factory>(self, factory: F) -> Self {
        self.with_factory(Kind::Receiver, factory)
    }

    /// Adds a processor factory.
    pub fn processor<F: Factory>(self, factory: F) -> Self {
        self.with_factory(Kind::Processor, factory)
    }

    /// Adds an exporter factory.
    pub fn exporter<F: Factory>(self, factory: F) -> Self {
        self.with_factory(Kind::Exporter, factory)
    }

    /// Adds a connector factory.
    pub fn connector<F: Factory>(self, factory: F) -> Self {
        self.with_factory(Kind::Connector, factory)
    }

    /// Adds an extension factory.
    pub fn extension<F: Factory>(self, factory: F) -> Self {
        self.with_factory(Kind::Extension, factory)
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateFactory`] if two factories share a type
    /// within one kind.
    pub fn build(self) -> Result<Factories> {
        let mut factories = Factories::new();
        for (kind, factory) in self.pending {
            factories.register(kind, factory)?;
        }
        Ok(factories)
    }
}

impl Default for FactoriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
