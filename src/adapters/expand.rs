// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable expansion.
//!
//! [`ExpandConverter`] rewrites every string value of a document, replacing
//! `${NAME}` and `$NAME` with the value of the environment variable `NAME`.
//! A doubled `$$` yields a literal `$`. Keys are never rewritten.

use crate::domain::{Conf, ConfigError, Result};
use crate::ports::Converter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Pattern every expanded variable name must match.
pub const VARIABLE_NAME_PATTERN: &str = "^[a-zA-Z_][a-zA-Z0-9_]*$";

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(VARIABLE_NAME_PATTERN).expect("variable name pattern is valid"));

/// Converter that expands environment variable references in string values.
///
/// - `${NAME}` and `$NAME` expand to the variable's value, or to an empty
///   string when it is unset.
/// - `$$` is an escaped `$`, so `$$NAME` stays `$NAME` and `$$$NAME` is `$`
///   followed by the value.
/// - A `$` at the end of a string is kept; `${}` and an unterminated `${` are
///   dropped.
/// - A referenced name that does not match [`VARIABLE_NAME_PATTERN`] is an
///   error.
///
/// The bare `$NAME` form is deprecated. The first bare reference to each
/// variable logs a warning; later ones are silent.
///
/// Expansion always produces strings, and component decoding does not coerce
/// strings to numbers or booleans. A document such as
/// `min_size_items: ${BATCH_MIN}` therefore fails to decode into an integer
/// field; only string-typed fields (and durations parsed from strings) can
/// take expanded values.
///
/// # Examples
///
/// ```rust
/// use colcfg::adapters::ExpandConverter;
/// use colcfg::domain::Conf;
/// use colcfg::ports::Converter;
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("OTLP_HOST".to_string(), "collector".to_string());
/// let converter = ExpandConverter::with_values(values);
///
/// let mut conf = Conf::from_yaml("exporters:\n  otlp:\n    endpoint: ${OTLP_HOST}:4317\n").unwrap();
/// converter.convert(&mut conf).unwrap();
/// assert_eq!(
///     conf.get("exporters").unwrap()["otlp"]["endpoint"].as_str(),
///     Some("collector:4317")
/// );
/// ```
#[derive(Debug, Default)]
pub struct ExpandConverter {
    /// Injected values; the process environment is used when absent
    values: Option<HashMap<String, String>>,
    /// Variables already warned about for using the bare form
    deprecated: Mutex<HashSet<String>>,
}

impl ExpandConverter {
    /// Creates a converter reading the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with pre-populated values for testing.
    ///
    /// **Note**: This method is primarily intended for testing. The process
    /// environment is not consulted at all.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: Some(values),
            deprecated: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the variables referenced with the deprecated `$NAME` form so
    /// far, sorted.
    pub fn deprecated_variables(&self) -> Vec<String> {
        let deprecated = self.deprecated.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = deprecated.iter().cloned().collect();
        names.sort();
        names
    }

    /// Expands every variable reference in one string.
    pub fn expand(&self, s: &str) -> Result<String> {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(s.len());
        let mut start = 0;
        let mut j = 0;

        while j < bytes.len() {
            if bytes[j] == b'$' && j + 1 < bytes.len() {
                out.push_str(&s[start..j]);
                let (reference, width) = shell_name(&s[j + 1..]);
                match reference {
                    Reference::Malformed => {}
                    Reference::Literal => out.push('$'),
                    Reference::Name { name, braced } => out.push_str(&self.lookup(name, braced)?),
                }
                j += width;
                start = j + 1;
            }
            j += 1;
        }

        out.push_str(&s[start..]);
        Ok(out)
    }

    fn lookup(&self, name: &str, braced: bool) -> Result<String> {
        if name == "$" {
            return Ok("$".to_string());
        }
        if !braced {
            self.warn_deprecated(name);
        }
        if !VARIABLE_NAME.is_match(name) {
            return Err(ConfigError::InvalidVariable {
                name: name.to_string(),
                pattern: VARIABLE_NAME_PATTERN.to_string(),
            });
        }

        let value = match &self.values {
            Some(values) => values.get(name).cloned(),
            None => env::var(name).ok(),
        };
        Ok(value.unwrap_or_default())
    }

    fn warn_deprecated(&self, name: &str) {
        let mut deprecated = self.deprecated.lock().unwrap_or_else(PoisonError::into_inner);
        if deprecated.insert(name.to_string()) {
            warn!(
                variable = name,
                "Variable substitution using $VAR will be deprecated in favor of ${{VAR}} and ${{env:VAR}}, please update ${}",
                name
            );
        }
    }

    fn expand_value(&self, value: &mut Value) -> Result<()> {
        match value {
            Value::String(s) => *s = self.expand(s)?,
            Value::Sequence(seq) => {
                for item in seq {
                    self.expand_value(item)?;
                }
            }
            Value::Mapping(map) => {
                for (_, item) in map.iter_mut() {
                    self.expand_value(item)?;
                }
            }
            Value::Tagged(tagged) => self.expand_value(&mut tagged.value)?,
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
        Ok(())
    }
}

impl Converter for ExpandConverter {
    fn name(&self) -> &str {
        "expand"
    }

    fn convert(&self, conf: &mut Conf) -> Result<()> {
        for (_, value) in conf.as_mapping_mut().iter_mut() {
            self.expand_value(value)?;
        }
        Ok(())
    }
}

/// What follows a `$`.
enum Reference<'a> {
    /// A variable name, with or without braces.
    Name { name: &'a str, braced: bool },
    /// Nothing that starts a reference; the `$` is kept.
    Literal,
    /// A broken `${` form; the consumed characters are dropped.
    Malformed,
}

/// Reads the reference at the start of `s` (the text after a `$`) and returns
/// it with the number of bytes it spans.
fn shell_name(s: &str) -> (Reference<'_>, usize) {
    let b = s.as_bytes();
    if b[0] == b'{' {
        if b.len() > 2 && is_shell_special(b[1]) && b[2] == b'}' {
            return (
                Reference::Name {
                    name: &s[1..2],
                    braced: true,
                },
                3,
            );
        }
        return match b[1..].iter().position(|&c| c == b'}') {
            Some(0) => (Reference::Malformed, 2),
            Some(p) => (
                Reference::Name {
                    name: &s[1..p + 1],
                    braced: true,
                },
                p + 2,
            ),
            None => (Reference::Malformed, 1),
        };
    }

    if is_shell_special(b[0]) {
        return (
            Reference::Name {
                name: &s[0..1],
                braced: false,
            },
            1,
        );
    }

    let len = b
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric() || **c == b'_')
        .count();
    if len == 0 {
        (Reference::Literal, 0)
    } else {
        (
            Reference::Name {
                name: &s[..len],
                braced: false,
            },
            len,
        )
    }
}

fn is_shell_special(c: u8) -> bool {
    matches!(c, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-' | b'0'..=b'9')
}
