// SPDX-License-Identifier: MIT OR Apache-2.0

//! No-op components.

use crate::ports::{ComponentConfig, Factory};
use serde::{Deserialize, Serialize};

/// Configuration of a `nop` component. It has no fields, so any key set on it
/// is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NopConfig {}

impl ComponentConfig for NopConfig {}

/// Factory for the `nop` type. It can be registered under any kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopFactory;

impl Factory for NopFactory {
    type Config = NopConfig;

    fn component_type(&self) -> &str {
        "nop"
    }

    fn create_default_config(&self) -> NopConfig {
        NopConfig {}
    }
}
