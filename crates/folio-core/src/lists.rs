//! Tolerant decoding for list-valued fields
//!
//! The hosted store does not keep JSON arrays faithfully: a list whose
//! middle element was deleted comes back as an object keyed by index, and
//! removed elements can show up as `null` holes. Every list field in the
//! schema goes through these helpers so either shape decodes.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde_json::Value;

use crate::error::json_type_name;

/// Decode a list from an array or from an index-keyed object.
///
/// `null` decodes to an empty list and `null` elements are skipped.
/// Object entries are ordered numerically when every key is an integer,
/// lexically otherwise.
pub fn list_from_value<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(serde_json::from_value)
            .collect(),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> =
                map.into_iter().filter(|(_, item)| !item.is_null()).collect();
            if entries.iter().all(|(key, _)| key.parse::<u64>().is_ok()) {
                entries.sort_by_key(|(key, _)| key.parse::<u64>().unwrap_or(u64::MAX));
            } else {
                entries.sort_by(|a, b| a.0.cmp(&b.0));
            }
            entries
                .into_iter()
                .map(|(_, item)| serde_json::from_value(item))
                .collect()
        }
        other => Err(serde_json::Error::custom(format!(
            "expected a list, found {}",
            json_type_name(&other)
        ))),
    }
}

/// `deserialize_with` adapter for required list fields
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    list_from_value(value).map_err(D::Error::custom)
}

/// `deserialize_with` adapter for optional list fields in patches
///
/// Pair with `#[serde(default)]` so an absent key stays `None`.
pub fn deserialize_opt<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => list_from_value(value).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_skips_null_holes() {
        let list: Vec<String> = list_from_value(json!(["a", null, "c"])).unwrap();
        assert_eq!(list, vec!["a", "c"]);
    }

    #[test]
    fn test_index_keyed_object_orders_numerically() {
        let list: Vec<u32> = list_from_value(json!({"10": 3, "2": 2, "0": 1})).unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_named_keys_order_lexically() {
        let list: Vec<u32> = list_from_value(json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn test_null_is_empty() {
        let list: Vec<u32> = list_from_value(Value::Null).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        let err = list_from_value::<u32>(json!("nope")).unwrap_err();
        assert!(err.to_string().contains("expected a list"));
    }
}
