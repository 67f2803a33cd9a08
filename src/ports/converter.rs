// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document converter trait definition.
//!
//! Converters rewrite a raw document in place after it has been retrieved and
//! before resolution begins, e.g. to expand variable references.

use crate::domain::{Conf, Result};

/// A trait for rewriting a raw document before resolution.
///
/// # Examples
///
/// ```rust
/// use colcfg::ports::Converter;
/// use colcfg::domain::{Conf, Result};
///
/// // Drops a top-level key used only by humans.
/// struct StripNotes;
///
/// impl Converter for StripNotes {
///     fn name(&self) -> &str {
///         "strip-notes"
///     }
///
///     fn convert(&self, conf: &mut Conf) -> Result<()> {
///         conf.as_mapping_mut().remove("notes");
///         Ok(())
///     }
/// }
///
/// let mut conf = Conf::from_yaml("notes: hi\nreceivers:\n").unwrap();
/// StripNotes.convert(&mut conf).unwrap();
/// assert!(!conf.is_set("notes"));
/// ```
pub trait Converter: Send + Sync {
    /// Returns the name of this converter, used in logs.
    fn name(&self) -> &str;

    /// Rewrites the document. An error aborts the resolution pass.
    fn convert(&self, conf: &mut Conf) -> Result<()>;
}
