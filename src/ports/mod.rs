// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which the
//! resolver talks to the outside: component factories, document sources,
//! parsers and converters. Adapters and component crates implement them.

pub mod converter;
pub mod factory;
pub mod parser;
pub mod source;

// Re-export commonly used types
pub use converter::Converter;
pub use factory::{AsAny, ComponentConfig, DynFactory, Factory};
pub use parser::ConfigParser;
pub use source::ConfigSource;
