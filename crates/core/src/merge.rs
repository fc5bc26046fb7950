//! Override merging for configuration and entity JSON.

use crate::error::{Error, Result};
use serde_json::Value;

/// Merge two JSON objects; keys of `second` replace those of `first`, keys
/// only present in `first` are kept.
///
/// When either side is `null` or an empty object the other side is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::Merge`] when both sides are non-empty and either is not
/// a JSON object.
pub fn merge(first: &Value, second: &Value) -> Result<Value> {
    if is_empty(first) {
        return Ok(second.clone());
    }
    if is_empty(second) {
        return Ok(first.clone());
    }
    let (Value::Object(base), Value::Object(overrides)) = (first, second) else {
        return Err(Error::merge(format!(
            "can only merge objects, got {} and {}",
            kind(first),
            kind(second)
        )));
    };

    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(merged))
}

/// Merge a sequence of override layers onto a base, in order.
///
/// # Errors
///
/// Returns the first [`Error::Merge`] raised by a layer.
pub fn merge_all<'a>(base: &Value, layers: impl IntoIterator<Item = &'a Value>) -> Result<Value> {
    layers
        .into_iter()
        .try_fold(base.clone(), |acc, layer| merge(&acc, layer))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_second_wins_first_preserved() {
        let merged = merge(
            &json!({ "baseName": "shop", "dtoSuffix": "DTO" }),
            &json!({ "baseName": "store", "reactive": true }),
        )
        .unwrap();
        assert_eq!(
            merged,
            json!({ "baseName": "store", "dtoSuffix": "DTO", "reactive": true })
        );
    }

    #[test]
    fn test_merge_is_shallow() {
        let merged = merge(
            &json!({ "secure": { "securityType": "roles", "roles": [] } }),
            &json!({ "secure": { "securityType": "privileges" } }),
        )
        .unwrap();
        assert_eq!(merged, json!({ "secure": { "securityType": "privileges" } }));
    }

    #[test]
    fn test_empty_sides_return_other() {
        assert_eq!(merge(&Value::Null, &json!({ "a": 1 })).unwrap(), json!({ "a": 1 }));
        assert_eq!(merge(&json!({ "a": 1 }), &json!({})).unwrap(), json!({ "a": 1 }));
        assert_eq!(merge(&json!({}), &json!("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_non_objects_fail() {
        let error = merge(&json!({ "a": 1 }), &json!([1, 2])).unwrap_err();
        assert!(matches!(error, Error::Merge { .. }));
        assert!(error.to_string().contains("an array"));
    }

    #[test]
    fn test_merge_all_applies_layers_in_order() {
        let merged = merge_all(
            &json!({ "a": 1, "b": 1 }),
            [&json!({ "b": 2 }), &json!({ "b": 3, "c": 3 })],
        )
        .unwrap();
        assert_eq!(merged, json!({ "a": 1, "b": 3, "c": 3 }));
    }
}
