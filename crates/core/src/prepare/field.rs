use crate::config::ApplicationConfig;
use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::model::naming::{hibernate_snake_case, humanize, is_reserved, snake, upper_first};
use crate::model::{
    BlobContent, Entity, Field, FieldDefinition, FieldType, ValidationFlags, derive_flags,
};

/// Prepare the fields of every registered entity.
///
/// An entity with neither an id field nor an id relationship first gets an
/// auto-generated `id` of the application's primary key type.
///
/// # Errors
///
/// Returns [`Error::UnknownFieldType`] for an unsupported declared type.
pub fn prepare_fields(ctx: &mut GenerationContext) -> Result<()> {
    let keys: Vec<_> = ctx.entities.keys().collect();
    for key in keys {
        let entity = ctx.entities.get_mut_by_key(key)?;
        entity.fields = entity_fields(entity, &ctx.config)?;
        tracing::trace!(entity = %entity.name, fields = entity.fields.len(), "Prepared fields");
    }
    Ok(())
}

fn entity_fields(entity: &Entity, config: &ApplicationConfig) -> Result<Vec<Field>> {
    let definition = &entity.definition;
    let mut declared: Vec<(FieldDefinition, bool)> = Vec::with_capacity(definition.fields.len() + 1);
    if !definition.has_id_field() && !definition.has_id_relationship() {
        let id = FieldDefinition::new("id", config.primary_key_type().name());
        declared.push((id, true));
    }
    declared.extend(definition.fields.iter().cloned().map(|f| (f, false)));

    // A single own id may be generated by the database; composite and
    // derived keys never are.
    let own_ids = declared.iter().filter(|(f, _)| f.is_id()).count();
    let single_id = own_ids == 1 && !definition.has_id_relationship();

    declared
        .iter()
        .map(|(definition, added)| {
            prepare_field(entity, definition, *added || entity.built_in, single_id, config)
        })
        .collect()
}

fn prepare_field(
    entity: &Entity,
    definition: &FieldDefinition,
    built_in: bool,
    single_id: bool,
    config: &ApplicationConfig,
) -> Result<Field> {
    let name = &definition.field_name;
    let field_type = FieldType::parse(
        &definition.field_type,
        definition.field_type_blob_content.as_deref(),
        definition.field_values.is_some(),
    )
    .ok_or_else(|| Error::unknown_field_type(&entity.name, name, &definition.field_type))?;

    let id = definition.is_id();
    let auto_generate = id && single_id && field_type.is_auto_generatable();
    let blob_content = field_type.blob_content();
    let validation = ValidationFlags::from_rules(&definition.field_validate_rules);

    let mut column_name = hibernate_snake_case(name);
    if is_reserved(&column_name) {
        column_name = format!("{}_{column_name}", config.jhi_prefix);
    }

    Ok(Field {
        field_name: name.clone(),
        javadoc: definition.javadoc.clone(),
        enum_values: definition
            .field_values
            .as_deref()
            .map(parse_enum_values)
            .unwrap_or_default(),
        field_name_capitalized: upper_first(name),
        field_name_underscored: snake(name),
        field_name_humanized: if name == "id" {
            "ID".to_string()
        } else {
            humanize(name)
        },
        field_in_java_bean_method: java_bean_name(name),
        column_name,
        field_translation_key: if id {
            "global.field.id".to_string()
        } else {
            format!("{}.{name}", entity.names.i18n_key_prefix)
        },
        ts_type: field_type.ts_type().to_string(),
        id,
        auto_generate,
        readonly: id,
        nullable: !validation.field_validation_required && !id,
        unique: validation.field_validation_unique,
        built_in,
        blob_content_type_any: blob_content == Some(BlobContent::Any),
        blob_content_type_image: blob_content == Some(BlobContent::Image),
        blob_content_type_text: blob_content == Some(BlobContent::Text),
        field_with_content_type: matches!(
            blob_content,
            Some(BlobContent::Any | BlobContent::Image)
        ),
        type_flags: derive_flags(&field_type),
        validation,
        field_validate_rules: definition.field_validate_rules.clone(),
        field_validate_rules_minlength: definition.field_validate_rules_minlength.clone(),
        field_validate_rules_maxlength: definition.field_validate_rules_maxlength.clone(),
        field_validate_rules_pattern: definition.field_validate_rules_pattern.clone(),
        field_validate_rules_min: definition.field_validate_rules_min.clone(),
        field_validate_rules_max: definition.field_validate_rules_max.clone(),
        field_validate_rules_minbytes: definition.field_validate_rules_minbytes.clone(),
        field_validate_rules_maxbytes: definition.field_validate_rules_maxbytes.clone(),
        field_type,
    })
}

/// `VALUE_A (a),VALUE_B` → `["VALUE_A", "VALUE_B"]`
fn parse_enum_values(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(|value| value.split('(').next().unwrap_or(value).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bean accessor suffix. `xName` keeps its case (`getxName`).
fn java_bean_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(_), Some(second)) if second.is_uppercase() => name.to_string(),
        _ => upper_first(name),
    }
}
