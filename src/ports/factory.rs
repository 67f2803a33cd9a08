// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component factory and configuration traits.
//!
//! This module defines the capability set every component type provides to the
//! resolver: produce a default configuration, decode a raw sub-document over it,
//! and validate the result. Factories are written against the typed [`Factory`]
//! trait; the registry stores them behind the object-safe [`DynFactory`] trait.

use crate::domain::decode::decode_onto;
use crate::domain::{Result, ValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;
use std::any::Any;
use std::fmt::Debug;

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A resolved component configuration.
///
/// The resolver only ever sees configurations through this trait. Concrete
/// types are recovered with [`downcast_ref`](trait.ComponentConfig.html#method.downcast_ref).
///
/// # Examples
///
/// ```rust
/// use colcfg::ports::ComponentConfig;
/// use colcfg::domain::ValidationError;
///
/// #[derive(Debug)]
/// struct PortConfig {
///     port: u16,
/// }
///
/// impl ComponentConfig for PortConfig {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.port == 0 {
///             return Err(ValidationError::field("port", "must not be zero"));
///         }
///         Ok(())
///     }
/// }
///
/// let boxed: Box<dyn ComponentConfig> = Box::new(PortConfig { port: 0 });
/// assert!(boxed.validate().is_err());
/// assert_eq!(boxed.downcast_ref::<PortConfig>().unwrap().port, 0);
/// ```
pub trait ComponentConfig: AsAny + Debug + Send + Sync + 'static {
    /// Checks the semantic invariants of this configuration.
    ///
    /// Implementations run cheap, pure field checks in a fixed order and
    /// return the first failure. The default accepts every value.
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

impl dyn ComponentConfig {
    /// Returns the concrete configuration if it is of type `T`.
    pub fn downcast_ref<T: ComponentConfig>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns true if the concrete configuration is of type `T`.
    pub fn is<T: ComponentConfig>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A factory for one component type.
///
/// # Examples
///
/// ```rust
/// use colcfg::ports::{ComponentConfig, Factory};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct DebugConfig {
///     verbosity: String,
/// }
///
/// impl ComponentConfig for DebugConfig {}
///
/// struct DebugExporterFactory;
///
/// impl Factory for DebugExporterFactory {
///     type Config = DebugConfig;
///
///     fn component_type(&self) -> &str {
///         "debug"
///     }
///
///     fn create_default_config(&self) -> DebugConfig {
///         DebugConfig { verbosity: "basic".to_string() }
///     }
/// }
///
/// let factory = DebugExporterFactory;
/// let raw: serde_yaml::Value = serde_yaml::from_str("verbosity: detailed").unwrap();
/// let cfg = factory
///     .unmarshal(factory.create_default_config(), Some(&raw), "exporters::debug")
///     .unwrap();
/// assert_eq!(cfg.verbosity, "detailed");
/// ```
pub trait Factory: Send + Sync + 'static {
    /// The configuration type this factory produces.
    type Config: ComponentConfig + Serialize + DeserializeOwned;

    /// Returns the type name this factory is registered under.
    fn component_type(&self) -> &str;

    /// Returns a fresh default configuration.
    ///
    /// Every call must return an independent value.
    fn create_default_config(&self) -> Self::Config;

    /// Decodes a raw sub-document over a default configuration.
    ///
    /// The default implementation uses strict default-merge decoding. Override
    /// it to pre-check the raw document before decoding.
    fn unmarshal(
        &self,
        default: Self::Config,
        raw: Option<&Value>,
        scope: &str,
    ) -> Result<Self::Config> {
        decode_onto(default, raw, scope)
    }
}

/// Object-safe view of a [`Factory`], used by the registry.
///
/// Implemented for every `Factory`; there is no need to implement it by hand.
pub trait DynFactory: Send + Sync {
    /// Returns the type name this factory is registered under.
    fn factory_type(&self) -> &str;

    /// Returns a fresh default configuration, type-erased.
    fn default_config(&self) -> Box<dyn ComponentConfig>;

    /// Produces the merged configuration for one declared component.
    fn resolve(&self, raw: Option<&Value>, scope: &str) -> Result<Box<dyn ComponentConfig>>;
}

impl<F: Factory> DynFactory for F {
    fn factory_type(&self) -> &str {
        self.component_type()
    }

    fn default_config(&self) -> Box<dyn ComponentConfig> {
        Box::new(self.create_default_config())
    }

    fn resolve(&self, raw: Option<&Value>, scope: &str) -> Result<Box<dyn ComponentConfig>> {
        let default = self.create_default_config();
        let config = self.unmarshal(default, raw, scope)?;
        Ok(Box::new(config))
    }
}
