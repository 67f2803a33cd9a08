// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing source and converter implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: a YAML file source and parser, and the environment variable
//! expansion converter.

#[cfg(feature = "env")]
pub mod expand;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use expand::ExpandConverter;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
