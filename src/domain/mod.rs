// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the types every other layer is built on: component
//! identifiers and kinds, the raw configuration document, the default-merge
//! decoder and the error taxonomy. It is independent of any file format
//! adapter or factory implementation.

pub mod component_id;
pub mod conf;
pub mod decode;
pub mod errors;
pub mod kind;

// Re-export commonly used types
pub use component_id::ComponentID;
pub use conf::Conf;
pub use errors::{
    ConfigError, Result, Scope, ValidationError, ValidationFailure, ValidationReport,
};
pub use kind::Kind;
