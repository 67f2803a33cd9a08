// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration resolver.
//!
//! The resolver ties the other layers together: it pulls documents from
//! sources, runs converters over them, and hands the result to the settings
//! assembler and validator.

pub mod resolver;

// Re-export commonly used types
pub use resolver::{ConfigResolver, ConfigResolverBuilder};
