//! Blueprint loading and application
//!
//! A blueprint is a JSON document that overrides parts of a project:
//!
//! ```json
//! {
//!   "name": "audited",
//!   "config": { "jhiPrefix": "app" },
//!   "entities": { "Order": { "pagination": "infinite-scroll" } }
//! }
//! ```
//!
//! Overrides go through the core merge rules: configuration keys replace
//! the project's, entity keys replace those of the matching definition, and
//! an entity the project does not define is added.

use crate::{CodegenError, Result};
use entigen_core::merge::merge;
use entigen_core::priorities::names;
use entigen_core::snapshot::to_canonical_value;
use entigen_core::{EntityDefinition, GenerationContext, Generator, Registrar, TaskGroup};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Contents of a blueprint file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintData {
    /// Blueprint name; defaults to the file stem
    #[serde(default)]
    pub name: String,
    /// Application configuration overrides
    #[serde(default)]
    pub config: Value,
    /// Entity overrides keyed by entity name
    #[serde(default)]
    pub entities: IndexMap<String, Value>,
}

/// A loaded blueprint
#[derive(Debug, Clone)]
pub struct Blueprint {
    data: BlueprintData,
    source_path: PathBuf,
}

impl Blueprint {
    /// Load a blueprint from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read or is not
    /// a blueprint document
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CodegenError::Blueprint(format!(
                "Blueprint file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CodegenError::Blueprint(format!("Failed to read blueprint: {e}")))?;
        let mut data: BlueprintData = serde_json::from_str(&content)?;
        if data.name.is_empty() {
            data.name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("blueprint")
                .to_string();
        }
        if !(data.config.is_null() || data.config.is_object()) {
            return Err(CodegenError::Blueprint(format!(
                "Blueprint '{}' has a non-object config",
                data.name
            )));
        }

        tracing::debug!(
            blueprint = %data.name,
            entities = data.entities.len(),
            path = %path.display(),
            "Loaded blueprint"
        );
        Ok(Self::from_data(data, path))
    }

    /// Wrap already parsed blueprint data
    #[must_use]
    pub fn from_data(data: BlueprintData, source_path: impl Into<PathBuf>) -> Self {
        Self {
            data,
            source_path: source_path.into(),
        }
    }

    /// Blueprint name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Generator namespace, `blueprint:<name>`
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("blueprint:{}", self.data.name)
    }

    /// Get the blueprint data
    #[must_use]
    pub const fn data(&self) -> &BlueprintData {
        &self.data
    }

    /// Get the source path of this blueprint
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Merge the blueprint's overrides into a run context
    ///
    /// Replaced definitions lose any options resolved earlier so they are
    /// configured again.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is not an object or the merged
    /// document is no longer a valid configuration or entity definition
    pub fn apply(&self, ctx: &mut GenerationContext) -> Result<()> {
        if !self.data.config.is_null() {
            ctx.config = ctx.config.merged_with(&self.data.config)?;
        }

        for (name, overrides) in &self.data.entities {
            let definition = match ctx.sources.get(name) {
                Some(source) => {
                    let base = to_canonical_value(&source.definition)?;
                    serde_json::from_value::<EntityDefinition>(merge(&base, overrides)?)?
                }
                None => {
                    tracing::debug!(blueprint = %self.data.name, entity = %name, "Adding entity");
                    serde_json::from_value::<EntityDefinition>(overrides.clone())?
                }
            };
            ctx.add_definition(EntityDefinition {
                name: name.clone(),
                ..definition
            });
        }
        Ok(())
    }
}

/// Generator applying a [`Blueprint`] at the `configuring` priority
#[derive(Debug, Clone)]
pub struct BlueprintGenerator {
    blueprint: Arc<Blueprint>,
    namespace: String,
}

impl BlueprintGenerator {
    /// Create a generator for a blueprint
    #[must_use]
    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            namespace: blueprint.namespace(),
            blueprint: Arc::new(blueprint),
        }
    }

    /// The wrapped blueprint
    #[must_use]
    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }
}

impl Generator for BlueprintGenerator {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn register_tasks(&self, registrar: &mut Registrar<'_>) -> entigen_core::Result<()> {
        let blueprint = Arc::clone(&self.blueprint);
        registrar.register(
            names::CONFIGURING,
            TaskGroup::new("applyBlueprint").task("mergeOverrides", move |ctx| {
                blueprint.apply(ctx)?;
                tracing::info!(blueprint = %blueprint.name(), "Applied blueprint");
                Ok(())
            }),
        )
    }
}
