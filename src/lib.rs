// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration resolution core for pluggable telemetry collectors.
//!
//! A collector is assembled from components of five kinds (receivers,
//! processors, exporters, connectors and extensions), each provided by a
//! factory registered under a type name. This crate turns a raw, user-written
//! document into a validated, strongly-typed set of component configurations
//! plus the `service` section that wires them into pipelines.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`ComponentID`, `Conf`, the
//!   default-merge decoder, errors)
//! - **Ports**: Trait definitions (`Factory`, `ComponentConfig`,
//!   `ConfigSource`, `ConfigParser`, `Converter`)
//! - **Adapters**: YAML file source and environment variable expansion
//! - **Settings**: Factory registries, per-kind config sets, settings assembly
//!   and validation
//! - **Service**: The resolver that runs a full pass over all of the above
//!
//! # Resolution
//!
//! Every declared component is produced by asking its factory for a fresh
//! default and overlaying the user's sub-document on it. Unknown fields are
//! rejected. Structural problems (an unknown type, a malformed identifier, a
//! sub-document that does not decode) abort resolution. Semantic problems are
//! found afterwards by validation, which reports every failing component at
//! once.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable expansion (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use colcfg::prelude::*;
//! use colcfg::components::{BatchProcessorFactory, BatcherConfig, NopFactory};
//!
//! # fn main() -> Result<()> {
//! let factories = Factories::builder()
//!     .receiver(NopFactory)
//!     .processor(BatchProcessorFactory)
//!     .exporter(NopFactory)
//!     .build()?;
//!
//! let doc = Conf::from_yaml(r#"
//! receivers:
//!   nop:
//! processors:
//!   batch:
//!     flush_timeout: 1s
//! exporters:
//!   nop:
//! service:
//!   pipelines:
//!     traces:
//!       receivers: [nop]
//!       processors: [batch]
//!       exporters: [nop]
//! "#)?;
//!
//! let settings = ConfigResolver::builder()
//!     .with_source(Box::new(doc))
//!     .with_factories(factories)
//!     .build()?
//!     .resolve()?;
//!
//! let batch = settings
//!     .processors
//!     .get_as::<BatcherConfig>(&ComponentID::new("batch"))
//!     .unwrap();
//! assert_eq!(batch.flush_timeout.as_secs(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod components;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ComponentID, Conf, ConfigError, Kind, Result, ValidationError, ValidationReport,
    };
    pub use crate::ports::{ComponentConfig, ConfigParser, ConfigSource, Converter, Factory};
    pub use crate::service::{ConfigResolver, ConfigResolverBuilder};
    pub use crate::settings::{Configs, Factories, Settings};

    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::ExpandConverter;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
