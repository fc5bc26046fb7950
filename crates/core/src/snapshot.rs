//! Canonical entity snapshots.
//!
//! A snapshot is the raw definition only: derived data and applied defaults
//! never reach it. Keys are sorted, indentation is two spaces and the
//! document ends with a newline, so unchanged entities produce identical
//! bytes across runs.

use crate::error::{Error, Result};
use crate::model::EntityDefinition;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Directory holding entity snapshots, relative to the project root.
pub const ENTITY_DIR: &str = ".jhipster";

/// Path of an entity's snapshot under a project root.
#[must_use]
pub fn snapshot_path(project_dir: &Path, entity_name: &str) -> std::path::PathBuf {
    project_dir.join(ENTITY_DIR).join(format!("{entity_name}.json"))
}

/// The canonical JSON value of a definition.
///
/// # Errors
///
/// Returns an error if the definition cannot be serialised.
pub fn to_canonical_value(definition: &EntityDefinition) -> Result<Value> {
    Ok(sort_keys(serde_json::to_value(definition)?))
}

/// Rebuild every object with its keys in sorted order, whatever map type
/// serde_json was built with.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Render a definition as a canonical snapshot document.
///
/// # Errors
///
/// Returns an error if the definition cannot be serialised.
pub fn to_canonical_string(definition: &EntityDefinition) -> Result<String> {
    let value = to_canonical_value(definition)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| Error::configuration(format!("snapshot is not UTF-8: {e}")))
}

/// Parse a snapshot document back into a definition.
///
/// # Errors
///
/// Returns an error if the document is not a valid entity definition.
pub fn from_canonical_str(contents: &str) -> Result<EntityDefinition> {
    Ok(serde_json::from_str(contents)?)
}
