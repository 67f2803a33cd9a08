// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which raw
//! configuration documents enter the resolver. Any place a document can come
//! from (a file, an inline string, a remote store) implements this trait.

use crate::domain::{Conf, Result};

/// A trait for configuration document sources.
///
/// Sources are retrieved in the order they were added to the resolver and
/// deep-merged, so a later source overrides keys set by an earlier one.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use colcfg::ports::ConfigSource;
/// use colcfg::domain::{Conf, Result};
///
/// struct FixedSource;
///
/// impl ConfigSource for FixedSource {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn retrieve(&self) -> Result<Conf> {
///         Conf::from_yaml("receivers:\n  nop:\n")
///     }
/// }
///
/// let conf = FixedSource.retrieve().unwrap();
/// assert!(conf.is_set("receivers"));
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this source, used in logs and error messages.
    fn name(&self) -> &str;

    /// Retrieves the current document from the source.
    ///
    /// Each call returns a fresh document; sources that read from storage read
    /// it again.
    fn retrieve(&self) -> Result<Conf>;
}

/// An in-memory document is a source of itself.
impl ConfigSource for Conf {
    fn name(&self) -> &str {
        "inline"
    }

    fn retrieve(&self) -> Result<Conf> {
        Ok(self.clone())
    }
}
