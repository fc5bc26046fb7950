//! Run context handed to every task.

use crate::config::ApplicationConfig;
use crate::model::{EntityDefinition, ResolvedOptions};
use crate::registry::EntityRegistry;
use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

/// A raw entity waiting to be prepared.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySource {
    /// The definition as authored.
    pub definition: EntityDefinition,
    /// Options with defaults applied; set during `configuringEachEntity`.
    pub options: Option<ResolvedOptions>,
}

impl EntitySource {
    /// A source that has not been configured yet.
    #[must_use]
    pub const fn new(definition: EntityDefinition) -> Self {
        Self {
            definition,
            options: None,
        }
    }
}

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    /// The file did not exist.
    Created,
    /// The file existed with different content.
    Updated,
    /// The file already held equivalent content and was left alone.
    Unchanged,
}

impl OutputStatus {
    /// Lowercase label used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for OutputStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file produced (or checked) by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Path of the file.
    pub path: PathBuf,
    /// Outcome of the write.
    pub status: OutputStatus,
}

/// State shared by the tasks of one generation run.
///
/// Created at run start and discarded at run end. The entity registry is
/// only written by the preparation phases; everything downstream reads it.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Application configuration; blueprints may replace it while configuring.
    pub config: ApplicationConfig,
    /// Raw entities keyed by name, in declaration order.
    pub sources: IndexMap<String, EntitySource>,
    /// Prepared entities.
    pub entities: EntityRegistry,
    /// Files written or checked during the run.
    pub outputs: Vec<OutputRecord>,
}

impl GenerationContext {
    /// A context with no entities.
    #[must_use]
    pub fn new(config: ApplicationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A context seeded with raw definitions, kept in the given order.
    ///
    /// A later definition with the same name replaces the earlier one.
    #[must_use]
    pub fn with_definitions(
        config: ApplicationConfig,
        definitions: impl IntoIterator<Item = EntityDefinition>,
    ) -> Self {
        let mut ctx = Self::new(config);
        for definition in definitions {
            ctx.add_definition(definition);
        }
        ctx
    }

    /// Add or replace a raw definition.
    pub fn add_definition(&mut self, definition: EntityDefinition) {
        self.sources
            .insert(definition.name.clone(), EntitySource::new(definition));
    }

    /// Record an output file.
    pub fn record_output(&mut self, path: impl Into<PathBuf>, status: OutputStatus) {
        self.outputs.push(OutputRecord {
            path: path.into(),
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_keep_declaration_order() {
        let ctx = GenerationContext::with_definitions(
            ApplicationConfig::default(),
            [
                EntityDefinition::named("Order"),
                EntityDefinition::named("Customer"),
            ],
        );
        assert_eq!(
            ctx.sources.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Order", "Customer"]
        );
        assert!(ctx.sources["Order"].options.is_none());
    }

    #[test]
    fn test_redefinition_replaces_in_place() {
        let mut ctx = GenerationContext::with_definitions(
            ApplicationConfig::default(),
            [
                EntityDefinition::named("Order"),
                EntityDefinition::named("Customer"),
            ],
        );
        let mut order = EntityDefinition::named("Order");
        order.javadoc = Some("Replaced".into());
        ctx.add_definition(order);

        assert_eq!(ctx.sources.get_index(0).map(|(k, _)| k.as_str()), Some("Order"));
        assert_eq!(ctx.sources["Order"].definition.javadoc.as_deref(), Some("Replaced"));
    }

    #[test]
    fn test_record_output() {
        let mut ctx = GenerationContext::default();
        ctx.record_output(".jhipster/Order.json", OutputStatus::Created);
        assert_eq!(ctx.outputs.len(), 1);
        assert_eq!(ctx.outputs[0].status.to_string(), "created");
    }
}
