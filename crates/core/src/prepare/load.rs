use crate::config::ApplicationConfig;
use crate::context::GenerationContext;
use crate::error::Result;
use crate::model::naming::{hibernate_snake_case, is_reserved};
use crate::model::{DtoStrategy, Entity, EntityDefinition, FieldDefinition, ResolvedOptions};
use serde_json::json;

/// Name of the built-in user entity.
pub const USER_ENTITY: &str = "User";

/// Register a bare entity for every definition.
///
/// The registry is cleared first. The built-in `User` comes first unless
/// user management is skipped; a user-supplied `User` definition is merged
/// into it. Other entities follow in declaration order.
///
/// # Errors
///
/// Returns [`crate::Error::DuplicateEntity`] if two definitions share a name.
pub fn load_entities(ctx: &mut GenerationContext) -> Result<()> {
    ctx.entities.clear();
    let defaults = ResolvedOptions::defaults(&ctx.config);
    let manage_users = !ctx.config.skip_user_management;

    if manage_users {
        let mut definition = built_in_user(&ctx.config);
        if let Some(source) = ctx.sources.get(USER_ENTITY) {
            tracing::debug!("Merging user-supplied User definition into the built-in one");
            merge_user(&mut definition, &source.definition);
        }
        let options = ResolvedOptions::resolve(&definition.options, &defaults);
        let table = format!("{}_user", ctx.config.jhi_prefix);
        let mut user = Entity::bare(definition, options, table);
        user.built_in = true;
        user.built_in_user = true;
        ctx.entities.insert(user)?;
    }

    for (name, source) in &ctx.sources {
        if manage_users && name == USER_ENTITY {
            continue;
        }
        let options = source
            .options
            .clone()
            .unwrap_or_else(|| ResolvedOptions::resolve(&source.definition.options, &defaults));
        let table = table_name(&source.definition, &ctx.config);
        ctx.entities
            .insert(Entity::bare(source.definition.clone(), options, table))?;
    }

    tracing::debug!(count = ctx.entities.len(), "Loaded entities");
    Ok(())
}

/// Table name of an entity: the explicit name or the snake-cased entity
/// name, prefixed when it collides with a reserved word.
#[must_use]
pub fn table_name(definition: &EntityDefinition, config: &ApplicationConfig) -> String {
    let table = definition
        .entity_table_name
        .clone()
        .unwrap_or_else(|| hibernate_snake_case(&definition.name));
    if is_reserved(&table) {
        format!("{}_{table}", config.jhi_prefix)
    } else {
        table
    }
}

/// The built-in user entity.
#[must_use]
pub fn built_in_user(config: &ApplicationConfig) -> EntityDefinition {
    let mut definition = EntityDefinition::named(USER_ENTITY);
    definition.options.dto = Some(DtoStrategy::Mapstruct);
    definition.fields = vec![
        FieldDefinition::new("id", config.primary_key_type().name()),
        sized("login", 50, &["required", "unique"]),
        sized("firstName", 50, &[]),
        sized("lastName", 50, &[]),
        sized("email", 191, &["unique"]),
        sized("imageUrl", 256, &[]),
        FieldDefinition {
            field_validate_rules: vec!["required".to_string()],
            ..FieldDefinition::new("activated", "Boolean")
        },
        sized("langKey", 10, &[]),
    ];
    definition
}

fn sized(name: &str, max_length: u32, rules: &[&str]) -> FieldDefinition {
    let mut field_validate_rules: Vec<String> = rules.iter().map(ToString::to_string).collect();
    field_validate_rules.push("maxlength".to_string());
    FieldDefinition {
        field_validate_rules,
        field_validate_rules_maxlength: Some(json!(max_length)),
        ..FieldDefinition::new(name, "String")
    }
}

/// Append the fields and relationships the built-in definition lacks.
fn merge_user(built_in: &mut EntityDefinition, supplied: &EntityDefinition) {
    for field in &supplied.fields {
        if !built_in.fields.iter().any(|f| f.field_name == field.field_name) {
            built_in.fields.push(field.clone());
        }
    }
    built_in
        .relationships
        .extend(supplied.relationships.iter().cloned());
    built_in.options = supplied.options.with_defaults(&built_in.options);
    if supplied.javadoc.is_some() {
        built_in.javadoc.clone_from(&supplied.javadoc);
    }
    if supplied.changelog_date.is_some() {
        built_in.changelog_date.clone_from(&supplied.changelog_date);
    }
}
