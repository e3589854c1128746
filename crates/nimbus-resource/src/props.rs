//! Fallible accessors over untyped property documents
//!
//! Property payloads are dynamically shaped per resource type, so they are
//! handled as `serde_json` trees with explicit, fallible field access
//! rather than static structs.

use serde_json::{Map, Value};
use thiserror::Error;

/// Conventional field holding resource tags.
pub const TAGS_FIELD: &str = "Tags";

/// Resource types whose control-plane schema wants tags as a map instead
/// of the usual `[{Key, Value}]` array. Confirmed for the node group type
/// only; extend with provider documentation, not by guesswork.
const MAP_TAG_TYPES: &[&str] = &["Nimbus::Compute::NodeGroup"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PropertyError {
    #[error("required property {0} not found")]
    Missing(String),

    #[error("property {field} is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("field path not found: '{0}'")]
    PathNotFound(String),
}

/// Extracts a required string property.
pub fn get_string(props: &Map<String, Value>, key: &str) -> Result<String, PropertyError> {
    let val = props
        .get(key)
        .ok_or_else(|| PropertyError::Missing(key.to_string()))?;
    val.as_str()
        .map(str::to_string)
        .ok_or_else(|| PropertyError::WrongType {
            field: key.to_string(),
            expected: "string",
        })
}

/// Extracts an optional string property; absent, empty, or non-string
/// values all read as `None`.
pub fn get_opt_string(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

/// Extracts an integer property, accepting either a JSON number or a
/// numeric string (callers round-trip documents through systems that
/// stringify numbers). Absent values fall back to `default`.
pub fn get_i64_or(
    props: &Map<String, Value>,
    key: &str,
    default: i64,
) -> Result<i64, PropertyError> {
    match props.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n.as_i64().ok_or(PropertyError::WrongType {
            field: key.to_string(),
            expected: "integer",
        }),
        Some(Value::String(s)) if s.is_empty() => Ok(default),
        Some(Value::String(s)) => s.parse::<i64>().map_err(|_| PropertyError::WrongType {
            field: key.to_string(),
            expected: "integer",
        }),
        Some(_) => Err(PropertyError::WrongType {
            field: key.to_string(),
            expected: "integer",
        }),
    }
}

/// Extracts a boolean property with a default.
pub fn get_bool_or(props: &Map<String, Value>, key: &str, default: bool) -> bool {
    props.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Whether the control-plane schema for this type wants map-shaped tags.
pub fn requires_map_tags(resource_type: &str) -> bool {
    MAP_TAG_TYPES.contains(&resource_type)
}

/// Rewrites `[{Key, Value}]` tags into a `{key: value}` map, in place.
/// A missing or non-array `Tags` field is left untouched.
pub fn tags_to_map(props: &mut Map<String, Value>) {
    let Some(Value::Array(tags)) = props.get(TAGS_FIELD) else {
        return;
    };

    let mut map = Map::new();
    for tag in tags {
        let Value::Object(tag) = tag else {
            continue;
        };
        if let (Some(key), Some(value)) = (
            tag.get("Key").and_then(Value::as_str),
            tag.get("Value").and_then(Value::as_str),
        ) {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    props.insert(TAGS_FIELD.to_string(), Value::Object(map));
}

/// Rewrites `{key: value}` tags back into the `[{Key, Value}]` array
/// shape, in place. A missing or non-object `Tags` field is left
/// untouched.
pub fn tags_to_array(props: &mut Map<String, Value>) {
    let Some(Value::Object(tags)) = props.get(TAGS_FIELD) else {
        return;
    };

    let mut array = Vec::with_capacity(tags.len());
    for (key, value) in tags {
        if let Value::String(value) = value {
            let mut entry = Map::new();
            entry.insert("Key".to_string(), Value::String(key.clone()));
            entry.insert("Value".to_string(), Value::String(value.clone()));
            array.push(Value::Object(entry));
        }
    }

    props.insert(TAGS_FIELD.to_string(), Value::Array(array));
}

/// Removes the fields named by `$.`-prefixed dotted paths, in place.
/// A missing leaf is a no-op; a missing intermediate object is an error,
/// since it means the static path table disagrees with the document.
pub fn strip_fields(props: &mut Map<String, Value>, paths: &[&str]) -> Result<(), PropertyError> {
    for path in paths {
        let trimmed = path.trim_start_matches('$').trim_start_matches('.');
        let components: Vec<&str> = trimmed.split('.').collect();
        let Some((leaf, parents)) = components.split_last() else {
            continue;
        };

        let mut current = &mut *props;
        for key in parents {
            match current.get_mut(*key) {
                Some(Value::Object(next)) => current = next,
                _ => return Err(PropertyError::PathNotFound(trimmed.to_string())),
            }
        }

        current.remove(*leaf);
    }
    Ok(())
}

/// Borrows the document as an object map, or fails with a shape error.
pub fn as_object(value: &Value) -> Result<&Map<String, Value>, PropertyError> {
    value.as_object().ok_or(PropertyError::WrongType {
        field: "properties".to_string(),
        expected: "object",
    })
}
