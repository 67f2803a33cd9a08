// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the text of a
//! configuration file into a raw [`Conf`] document.

use crate::domain::{Conf, Result};

/// A trait for parsing configuration text.
///
/// Unlike a flat key/value loader, a parser keeps the nesting of the input:
/// component sub-documents must arrive intact so they can be decoded over
/// their defaults.
///
/// # Examples
///
/// ```rust
/// use colcfg::ports::ConfigParser;
/// use colcfg::domain::{Conf, Result};
///
/// struct EmptyParser;
///
/// impl ConfigParser for EmptyParser {
///     fn parse(&self, _content: &str) -> Result<Conf> {
///         Ok(Conf::new())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["empty"]
///     }
/// }
///
/// assert!(EmptyParser.parse("anything").unwrap().is_empty());
/// ```
pub trait ConfigParser {
    /// Parses configuration text into a document.
    fn parse(&self, content: &str) -> Result<Conf>;

    /// Returns the file extensions (without the leading dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns true if a file with the given extension can be parsed.
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
