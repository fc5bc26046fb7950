//! Entity preparation.
//!
//! Turns raw definitions into prepared entities, one priority per step so
//! blueprints can hook in between:
//!
//! | priority | step |
//! |---|---|
//! | `configuringEachEntity` | apply default options |
//! | `loadingEntities` | register bare entities, built-ins first |
//! | `preparingEachEntity` | derived names |
//! | `preparingEachEntityField` | field types, flags and columns |
//! | `preparingEachEntityRelationship` | resolve targets, primary keys |
//! | `postPreparingEachEntity` | aggregates, then freeze |
//!
//! [`BootstrapGenerator`] registers the steps with a scheduler;
//! [`prepare_all`] runs them directly.

mod configure;
mod entity;
mod field;
mod load;
mod post;
mod relationship;

pub use configure::configure_entities;
pub use entity::{entity_names, prepare_entities};
pub use field::prepare_fields;
pub use load::{USER_ENTITY, built_in_user, load_entities, table_name};
pub use post::post_prepare_entities;
pub use relationship::prepare_relationships;

use crate::context::GenerationContext;
use crate::error::Result;
use crate::priorities::names;
use crate::scheduler::{Generator, Registrar, TaskGroup};

/// Namespace of the [`BootstrapGenerator`].
pub const NAMESPACE: &str = "bootstrap-application";

/// Registers the entity preparation phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapGenerator;

impl Generator for BootstrapGenerator {
    fn namespace(&self) -> &str {
        NAMESPACE
    }

    fn register_tasks(&self, registrar: &mut Registrar<'_>) -> Result<()> {
        registrar.register(
            names::CONFIGURING_EACH_ENTITY,
            TaskGroup::new("configureEntities").task("applyDefaultOptions", configure_entities),
        )?;
        registrar.register(
            names::LOADING_ENTITIES,
            TaskGroup::new("loadEntities").task("registerEntities", load_entities),
        )?;
        registrar.register(
            names::PREPARING_EACH_ENTITY,
            TaskGroup::new("prepareEntities").task("computeNames", prepare_entities),
        )?;
        registrar.register(
            names::PREPARING_EACH_ENTITY_FIELD,
            TaskGroup::new("prepareFields").task("prepareFields", prepare_fields),
        )?;
        registrar.register(
            names::PREPARING_EACH_ENTITY_RELATIONSHIP,
            TaskGroup::new("prepareRelationships")
                .task("resolveRelationships", prepare_relationships),
        )?;
        registrar.register(
            names::POST_PREPARING_EACH_ENTITY,
            TaskGroup::new("postPrepareEntities").task("freezeEntities", post_prepare_entities),
        )
    }
}

/// Run every preparation step in order, outside a scheduler.
///
/// # Errors
///
/// Returns the first error raised by a step.
pub fn prepare_all(ctx: &mut GenerationContext) -> Result<()> {
    configure_entities(ctx)?;
    load_entities(ctx)?;
    prepare_entities(ctx)?;
    prepare_fields(ctx)?;
    prepare_relationships(ctx)?;
    post_prepare_entities(ctx)
}
