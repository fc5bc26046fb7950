//! Reads raw entity definitions from a project's `.jhipster` directory.

use crate::config::ApplicationConfig;
use crate::error::{Error, Result};
use crate::model::EntityDefinition;
use crate::model::naming::upper_first;
use crate::snapshot::ENTITY_DIR;
use serde_json::Value;
use std::path::Path;

/// Read every `<Entity>.json` under `<project>/.jhipster`.
///
/// Files whose contents are not a JSON object are skipped with a warning.
/// A JSON object that does not deserialize as a definition is an error. A
/// definition without a `name` takes the file stem. The result follows the
/// configuration's `entities` list, then `changelogDate`, then name.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the directory does not exist,
/// [`Error::Io`] when it cannot be listed or read and [`Error::Json`] for
/// an invalid definition.
pub fn read_entity_dir(project_dir: &Path, config: &ApplicationConfig) -> Result<Vec<EntityDefinition>> {
    let dir = project_dir.join(ENTITY_DIR);
    if !dir.is_dir() {
        return Err(Error::configuration(format!(
            "entity directory {} does not exist",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(&dir)
        .map_err(|e| Error::io(e, Some(dir.clone()), "listing entity definitions"))?;
    let mut definitions = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::io(e, Some(dir.clone()), "listing entity definitions"))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::io(e, Some(path.clone()), "reading entity definition"))?;
        let value = match serde_json::from_str::<Value>(&contents) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Skipping file that is not a JSON object");
                continue;
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Skipping file that is not valid JSON");
                continue;
            }
        };
        definitions.push(definition_from_value(value, &path)?);
    }

    sort_definitions(&mut definitions, &config.entities);
    tracing::debug!(count = definitions.len(), dir = %dir.display(), "Read entity definitions");
    Ok(definitions)
}

/// Read a single definition file.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Json`] carrying the file path.
pub fn read_definition(path: &Path) -> Result<EntityDefinition> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::io(e, Some(path.to_path_buf()), "reading entity definition"))?;
    let value = serde_json::from_str(&contents).map_err(|e| Error::json(e, Some(path.to_path_buf())))?;
    definition_from_value(value, path)
}

fn definition_from_value(value: Value, path: &Path) -> Result<EntityDefinition> {
    let mut definition: EntityDefinition =
        serde_json::from_value(value).map_err(|e| Error::json(e, Some(path.to_path_buf())))?;
    if definition.name.is_empty() {
        definition.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(upper_first)
            .unwrap_or_default();
    }
    Ok(definition)
}

/// Entities listed in `declared` come first, in that order; the rest
/// follow by changelog date, then name.
pub fn sort_definitions(definitions: &mut [EntityDefinition], declared: &[String]) {
    definitions.sort_by(|a, b| {
        let rank = |d: &EntityDefinition| {
            declared
                .iter()
                .position(|name| *name == d.name)
                .unwrap_or(usize::MAX)
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.changelog_date.cmp(&b.changelog_date))
            .then_with(|| a.name.cmp(&b.name))
    });
}
