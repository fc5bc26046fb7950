//! Regeneration diffing: decide whether an entity definition changed.
//!
//! Comparison works on the JSON form so snapshots on disk and definitions
//! in memory are compared the same way.

use crate::error::Result;
use crate::model::EntityDefinition;
use serde_json::{Map, Value};

/// Compare two raw entity documents.
///
/// Null-valued keys are ignored. Fields and relationships are compared
/// pairwise in declared order, options with `jpaMetamodelFiltering: "no"`
/// treated as `false`, and security roles/actions element by element.
#[must_use]
pub fn entities_equal(first: &Value, second: &Value) -> bool {
    let (Some(first), Some(second)) = (without_nulls(first), without_nulls(second)) else {
        return first == second;
    };

    let first_fields = array(&first, "fields");
    let second_fields = array(&second, "fields");
    let first_relationships = array(&first, "relationships");
    let second_relationships = array(&second, "relationships");

    if first_fields.len() != second_fields.len()
        || first_relationships.len() != second_relationships.len()
        || first.get("javadoc") != second.get("javadoc")
        || first.get("entityTableName") != second.get("entityTableName")
        || first.len() != second.len()
        || first.contains_key("secure") != second.contains_key("secure")
    {
        return false;
    }

    fields_equal(first_fields, second_fields)
        && relationships_equal(first_relationships, second_relationships)
        && options_equal(&first, &second)
        && security_equal(first.get("secure"), second.get("secure"))
}

/// Compare two raw definitions.
///
/// # Errors
///
/// Returns an error if either definition cannot be serialised.
pub fn definitions_equal(first: &EntityDefinition, second: &EntityDefinition) -> Result<bool> {
    Ok(entities_equal(
        &serde_json::to_value(first)?,
        &serde_json::to_value(second)?,
    ))
}

fn without_nulls(value: &Value) -> Option<Map<String, Value>> {
    value.as_object().map(|map| {
        map.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    })
}

fn array<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn fields_equal(first: &[Value], second: &[Value]) -> bool {
    first.iter().zip(second).all(|(a, b)| {
        let (Some(a), Some(b)) = (a.as_object(), b.as_object()) else {
            return a == b;
        };
        a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
    })
}

fn relationships_equal(first: &[Value], second: &[Value]) -> bool {
    // Relationship keys are all scalars, so key-wise equality is enough.
    fields_equal(first, second)
}

fn options_equal(first: &Map<String, Value>, second: &Map<String, Value>) -> bool {
    ["dto", "pagination", "service", "searchEngine"]
        .iter()
        .all(|key| first.get(*key) == second.get(*key))
        && normalized_filtering(first) == normalized_filtering(second)
}

fn normalized_filtering(map: &Map<String, Value>) -> Option<Value> {
    match map.get("jpaMetamodelFiltering") {
        Some(Value::String(s)) if s == "no" => Some(Value::Bool(false)),
        other => other.cloned(),
    }
}

fn security_equal(first: Option<&Value>, second: Option<&Value>) -> bool {
    let (Some(first), Some(second)) = (first, second) else {
        return first.is_none() && second.is_none();
    };
    if first.get("securityType") != second.get("securityType") {
        return false;
    }
    if first.get("securityType").and_then(Value::as_str) == Some("roles") {
        lists_equal(first.get("roles"), second.get("roles"), "role", "actionList")
    } else {
        lists_equal(
            first.get("customSecurity"),
            second.get("customSecurity"),
            "action",
            "privList",
        )
    }
}

/// Compare two rule lists element by element, including each nested list.
fn lists_equal(first: Option<&Value>, second: Option<&Value>, key: &str, list: &str) -> bool {
    let (Some(Value::Array(first)), Some(Value::Array(second))) = (first, second) else {
        return true;
    };
    first.len() == second.len()
        && first.iter().zip(second).all(|(a, b)| {
            a.get(key) == b.get(key)
                && match (a.get(list), b.get(list)) {
                    (Some(Value::Array(x)), Some(Value::Array(y))) => x == y,
                    (x, y) => x == y,
                }
        })
}
