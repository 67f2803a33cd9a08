// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in components.
//!
//! The resolver itself does not know any component type. These are the few
//! that ship with the crate: the `batch` processor and `nop` components.

pub mod batcher;
pub mod nop;

pub use batcher::{BatchProcessorFactory, BatcherConfig};
pub use nop::{NopConfig, NopFactory};
