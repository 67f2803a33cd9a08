// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default-merge decoding.
//!
//! Every component configuration starts from its factory default. The raw
//! sub-document for the component is laid over that default: fields present in
//! the document win, fields absent from it keep their default value, and fields
//! the target type does not recognise are rejected.
//!
//! Decoding goes through the serialized form of the default:
//!
//! 1. the default is serialized to a [`Value`];
//! 2. the raw document is deep-merged over it;
//! 3. the merged value is deserialized into the target type, recording every
//!    key the target type ignores, so unknown keys are caught even when it
//!    does not deny unknown fields itself.
//!
//! A field skipped during serialization is absent from the merged value, so
//! it takes its serde default unless the raw document sets it. Field aliases
//! are not supported: the default always carries the canonical name, so an
//! aliased key in the document is a duplicate field.

use crate::domain::errors::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_ignored::Path;
use serde_yaml::Value;

/// Decodes `raw` over `default`, returning the merged configuration.
///
/// `scope` names the location being decoded (e.g. `exporters::otlp`) and is
/// carried in any error. An absent or null `raw` returns `default` untouched.
///
/// # Examples
///
/// ```
/// use colcfg::domain::decode::decode_onto;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// let default = Endpoint { host: "localhost".into(), port: 4317 };
/// let raw: serde_yaml::Value = serde_yaml::from_str("port: 4318").unwrap();
/// let merged = decode_onto(default, Some(&raw), "receivers::otlp").unwrap();
/// assert_eq!(merged, Endpoint { host: "localhost".into(), port: 4318 });
///
/// let typo: serde_yaml::Value = serde_yaml::from_str("prot: 4318").unwrap();
/// let default = Endpoint { host: "localhost".into(), port: 4317 };
/// assert!(decode_onto(default, Some(&typo), "receivers::otlp").is_err());
/// ```
pub fn decode_onto<T>(default: T, raw: Option<&Value>, scope: &str) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let raw = match raw {
        None | Some(Value::Null) => return Ok(default),
        Some(raw) => raw,
    };

    let mut merged = to_value(&default, scope)?;
    overlay(&mut merged, raw);

    let mut unknown = Vec::new();
    let decoded: T = serde_ignored::deserialize(merged, |path| {
        unknown.push(path_name(&path))
    })
    .map_err(|e| ConfigError::Decode {
        scope: scope.to_string(),
        message: format!("decoding failed: {}", e),
        source: Some(Box::new(e)),
    })?;

    if !unknown.is_empty() {
        return Err(ConfigError::decode(
            scope,
            format!("has invalid keys: {}", unknown.join(", ")),
        ));
    }

    Ok(decoded)
}

fn to_value<T: Serialize>(value: &T, scope: &str) -> Result<Value> {
    serde_yaml::to_value(value).map_err(|e| ConfigError::Decode {
        scope: scope.to_string(),
        message: format!("default configuration is not representable: {}", e),
        source: Some(Box::new(e)),
    })
}

/// Lays `raw` over `base`. Mappings merge recursively; a null over a mapping
/// keeps the mapping; anything else replaces.
fn overlay(base: &mut Value, raw: &Value) {
    match (base, raw) {
        (Value::Mapping(base), Value::Mapping(raw)) => {
            for (key, value) in raw {
                match base.get_mut(key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Mapping(_), Value::Null) => {}
        (base, raw) => *base = raw.clone(),
    }
}

/// Formats an ignored path as `outer::inner`, with sequence indices inline.
fn path_name(path: &Path<'_>) -> String {
    match path {
        Path::Root => String::new(),
        Path::Seq { parent, index } => join(parent, &index.to_string()),
        Path::Map { parent, key } => join(parent, key),
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            path_name(parent)
        }
    }
}

fn join(parent: &Path<'_>, segment: &str) -> String {
    let parent = path_name(parent);
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}::{}", parent, segment)
    }
}
