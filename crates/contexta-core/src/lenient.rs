//! Forgiving field decoders for model output.
//!
//! The generative service is asked to follow the schema contract but nothing
//! guarantees it does. These helpers are wired in with
//! `#[serde(deserialize_with = "...")]` so that a `null`, a missing field or a
//! value of the wrong JSON type degrades to an empty value instead of failing
//! the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings: `null` and containers become `""`, scalars are stringified.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional strings: only `null` (or a container) maps to `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_string(Value::deserialize(deserializer)?))
}

/// Arrays of records. Anything that is not an array decodes as empty and
/// items that fail to decode are dropped.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("dropping undecodable item: {e}");
                None
            }
        })
        .collect())
}

/// Arrays of strings, with the same scalar coercion as [`string`].
pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().filter_map(coerce_string).collect())
}

/// A nested object that may be absent, `null`, or malformed.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

fn coerce_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
