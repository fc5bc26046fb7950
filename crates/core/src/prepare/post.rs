use crate::context::GenerationContext;
use crate::error::Result;
use crate::model::{BlobContent, Entity, EntityAggregates, Field, RelationshipType};
use crate::registry::EntityRegistry;
use entigen_events::emit_entity_prepared;

/// Compute entity aggregates, then freeze every entity.
///
/// # Errors
///
/// Returns [`crate::Error::EntityFrozen`] if an entity was already frozen.
pub fn post_prepare_entities(ctx: &mut GenerationContext) -> Result<()> {
    let aggregates: Vec<_> = {
        let registry = &ctx.entities;
        registry
            .keys()
            .filter_map(|key| registry.resolve(key).map(|e| (key, aggregate(e, registry))))
            .collect()
    };

    let registry = &mut ctx.entities;

    for (key, aggregates) in aggregates {
        let entity = registry.get_mut_by_key(key)?;
        entity.aggregates = aggregates;
        let name = entity.name.clone();
        let (fields, relationships) = (entity.fields.len(), entity.relationships.len());
        registry.freeze(&name)?;
        emit_entity_prepared!(name, fields, relationships);
    }
    Ok(())
}

fn aggregate(entity: &Entity, registry: &EntityRegistry) -> EntityAggregates {
    let fields = &entity.fields;
    let relationships = &entity.relationships;
    let any_field = |predicate: fn(&Field) -> bool| fields.iter().any(predicate);
    let any_relationship = |kind: RelationshipType, owner: Option<bool>| {
        relationships
            .iter()
            .any(|r| r.relationship_type == kind && owner.is_none_or(|o| r.owner_side == o))
    };

    let mut different_types: Vec<String> = Vec::new();
    for field in fields {
        let name = field.field_type.name();
        if !different_types.iter().any(|t| t == name) {
            different_types.push(name.to_string());
        }
    }
    let mut other_entities: Vec<String> = Vec::new();
    for relationship in relationships {
        if !other_entities.contains(&relationship.other_entity_name) {
            other_entities.push(relationship.other_entity_name.clone());
        }
    }

    EntityAggregates {
        fields_contain_big_decimal: any_field(|f| f.type_flags.big_decimal),
        fields_contain_blob: any_field(|f| f.field_type.blob_content().is_some()),
        fields_contain_blob_or_image: any_field(|f| {
            matches!(
                f.field_type.blob_content(),
                Some(BlobContent::Any | BlobContent::Image)
            )
        }),
        fields_contain_date: any_field(|f| f.type_flags.temporal),
        fields_contain_duration: any_field(|f| f.type_flags.duration),
        fields_contain_embedded: relationships.iter().any(|r| {
            r.other_entity
                .and_then(|key| registry.resolve(key))
                .is_some_and(|other| other.options.embedded)
        }),
        fields_contain_image_blob: any_field(|f| f.blob_content_type_image),
        fields_contain_instant: any_field(|f| f.type_flags.instant),
        fields_contain_local_date: any_field(|f| f.type_flags.local_date),
        fields_contain_many_to_one: any_relationship(RelationshipType::ManyToOne, None),
        fields_contain_no_owner_one_to_one: any_relationship(RelationshipType::OneToOne, Some(false)),
        fields_contain_one_to_many: any_relationship(RelationshipType::OneToMany, None),
        fields_contain_owner_many_to_many: any_relationship(RelationshipType::ManyToMany, Some(true)),
        fields_contain_owner_one_to_one: any_relationship(RelationshipType::OneToOne, Some(true)),
        fields_contain_text_blob: any_field(|f| f.blob_content_type_text),
        fields_contain_uuid: any_field(|f| f.type_flags.uuid),
        fields_contain_zoned_date_time: any_field(|f| f.type_flags.zoned_date_time),
        have_field_with_javadoc: any_field(|f| f.javadoc.is_some()),
        validation: any_field(|f| f.validation.field_validate)
            || relationships.iter().any(|r| r.relationship_required),
        blob_fields: fields
            .iter()
            .filter(|f| f.field_type.blob_content().is_some())
            .map(|f| f.field_name.clone())
            .collect(),
        different_types,
        other_entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApplicationConfig;
    use crate::error::Error;
    use crate::model::{EntityDefinition, FieldDefinition, RelationshipDefinition};
    use crate::prepare::prepare_all;

    #[test]
    fn test_aggregates_and_freeze() {
        let mut order = EntityDefinition::named("Order");
        order.fields.push(FieldDefinition::new("placedAt", "Instant"));
        order.fields.push(FieldDefinition {
            field_type_blob_content: Some("text".into()),
            ..FieldDefinition::new("notes", "byte[]")
        });
        order.fields.push(FieldDefinition {
            javadoc: Some("Order total".into()),
            ..FieldDefinition::new("total", "BigDecimal")
        });
        let mut customer = RelationshipDefinition::new(RelationshipType::ManyToOne, "Customer");
        customer.other_entity_relationship_name = Some("orders".into());
        order.relationships.push(customer);

        let config = ApplicationConfig {
            skip_user_management: true,
            ..ApplicationConfig::default()
        };
        let mut ctx = GenerationContext::with_definitions(
            config,
            [order, EntityDefinition::named("Customer")],
        );
        prepare_all(&mut ctx).unwrap();

        let order = ctx.entities.get("Order").unwrap();
        let aggregates = &order.aggregates;
        assert!(aggregates.fields_contain_instant && aggregates.fields_contain_date);
        assert!(aggregates.fields_contain_blob && aggregates.fields_contain_text_blob);
        assert!(!aggregates.fields_contain_blob_or_image);
        assert!(aggregates.fields_contain_big_decimal && aggregates.have_field_with_javadoc);
        assert!(aggregates.fields_contain_many_to_one && !aggregates.fields_contain_one_to_many);
        assert_eq!(aggregates.blob_fields, vec!["notes"]);
        assert_eq!(
            aggregates.different_types,
            vec!["Long", "Instant", "byte[]", "BigDecimal"]
        );
        assert_eq!(aggregates.other_entities, vec!["Customer"]);

        let customer = ctx.entities.get("Customer").unwrap();
        assert!(customer.aggregates.fields_contain_one_to_many);

        assert!(ctx.entities.is_frozen("Order") && ctx.entities.is_frozen("Customer"));
        assert!(matches!(
            ctx.entities.get_mut("Order"),
            Err(Error::EntityFrozen { .. })
        ));
    }
}
