use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::model::naming::{humanize, lower_first, pluralize, upper_first};
use crate::model::{
    Entity, PrimaryKey, PrimaryKeyId, Relationship, RelationshipDefinition, RelationshipType,
};
use crate::registry::{EntityKey, EntityRegistry};

/// Resolve relationships and derive primary keys.
///
/// Runs in steps over the whole registry: resolve every target by name,
/// add missing inverse sides, validate `id` relationships, derive primary
/// keys (own keys first, then keys borrowed through `id` relationships) and
/// finally reject many-to-many relationships touching a composite key.
///
/// # Errors
///
/// Returns [`Error::UnresolvedEntityReference`] for a target missing from
/// the registry and [`Error::InvalidRelationship`] for cardinalities the
/// primary keys cannot support.
pub fn prepare_relationships(ctx: &mut GenerationContext) -> Result<()> {
    let registry = &mut ctx.entities;
    let keys: Vec<EntityKey> = registry.keys().collect();

    let mut resolved = Vec::with_capacity(keys.len());
    for &key in &keys {
        if let Some(entity) = registry.resolve(key) {
            resolved.push((key, resolve_relationships(entity, registry)?));
        }
    }
    for (key, relationships) in resolved {
        registry.get_mut_by_key(key)?.relationships = relationships;
    }

    add_inverse_relationships(registry, &keys)?;
    for &key in &keys {
        if let Some(entity) = registry.resolve(key) {
            validate_id_relationships(entity)?;
        }
    }
    derive_primary_keys(registry, &keys)?;
    validate_many_to_many(registry, &keys)
}

fn resolve_relationships(entity: &Entity, registry: &EntityRegistry) -> Result<Vec<Relationship>> {
    entity
        .definition
        .relationships
        .iter()
        .map(|definition| {
            let relationship_name = definition
                .relationship_name
                .clone()
                .unwrap_or_else(|| lower_first(&definition.other_entity_name));
            let other_entity = registry
                .key_of(&definition.other_entity_name)
                .ok_or_else(|| {
                    Error::unresolved_entity_reference(
                        &entity.name,
                        &relationship_name,
                        &definition.other_entity_name,
                    )
                })?;
            Ok(relationship(definition, relationship_name, other_entity))
        })
        .collect()
}

fn relationship(
    definition: &RelationshipDefinition,
    relationship_name: String,
    other_entity: EntityKey,
) -> Relationship {
    let relationship_type = definition.relationship_type;
    let owner_side = definition
        .owner_side
        .unwrap_or(relationship_type != RelationshipType::OneToMany);
    let mut relationship = named(relationship_type, relationship_name);
    relationship.other_entity_name.clone_from(&definition.other_entity_name);
    relationship
        .other_entity_relationship_name
        .clone_from(&definition.other_entity_relationship_name);
    relationship.other_entity_field = definition
        .other_entity_field
        .clone()
        .unwrap_or_else(|| "id".to_string());
    relationship.other_entity = Some(other_entity);
    relationship.owner_side = owner_side;
    relationship.relationship_required = definition.is_required();
    relationship.id = definition.id == Some(true);
    relationship.javadoc.clone_from(&definition.javadoc);
    relationship
}

fn named(relationship_type: RelationshipType, relationship_name: String) -> Relationship {
    let field_name = lower_first(&relationship_name);
    Relationship {
        relationship_type,
        relationship_name_capitalized: upper_first(&relationship_name),
        relationship_name_humanized: humanize(&relationship_name),
        relationship_field_name_plural: pluralize(&field_name),
        relationship_field_name: field_name,
        relationship_name,
        other_entity_name: String::new(),
        other_entity_relationship_name: None,
        other_entity_field: "id".to_string(),
        other_entity: None,
        owner_side: false,
        relationship_required: false,
        collection: relationship_type.is_collection(),
        id: false,
        javadoc: None,
        synthesized: false,
    }
}

/// Give targets the inverse side named by `otherEntityRelationshipName`
/// when they do not declare it themselves.
fn add_inverse_relationships(registry: &mut EntityRegistry, keys: &[EntityKey]) -> Result<()> {
    let mut additions: Vec<(EntityKey, Relationship)> = Vec::new();
    for &key in keys {
        let Some(entity) = registry.resolve(key) else {
            continue;
        };
        for relationship in &entity.relationships {
            let (Some(inverse_name), Some(target_key)) = (
                relationship.other_entity_relationship_name.as_deref(),
                relationship.other_entity,
            ) else {
                continue;
            };
            let Some(target) = registry.resolve(target_key) else {
                continue;
            };
            let declared = target
                .relationships
                .iter()
                .any(|r| r.relationship_name == inverse_name);
            let pending = additions
                .iter()
                .any(|(k, r)| *k == target_key && r.relationship_name == inverse_name);
            if declared || pending {
                continue;
            }

            let mut inverse = named(relationship.relationship_type.inverse(), inverse_name.to_string());
            inverse.other_entity_name.clone_from(&entity.name);
            inverse.other_entity_relationship_name = Some(relationship.relationship_name.clone());
            inverse.other_entity = Some(key);
            inverse.owner_side = !relationship.owner_side;
            inverse.synthesized = true;
            tracing::debug!(
                entity = %target.name,
                relationship = %inverse.relationship_name,
                "Added inverse relationship"
            );
            additions.push((target_key, inverse));
        }
    }

    for (key, inverse) in additions {
        registry.get_mut_by_key(key)?.relationships.push(inverse);
    }
    Ok(())
}

fn validate_id_relationships(entity: &Entity) -> Result<()> {
    for relationship in entity.relationships.iter().filter(|r| r.id) {
        let supported = relationship.relationship_type == RelationshipType::ManyToOne
            || relationship.is_owner_one_to_one();
        if !supported {
            return Err(Error::invalid_relationship(
                &entity.name,
                &relationship.relationship_name,
                "an id relationship must be many-to-one or the owner side of a one-to-one",
            ));
        }
    }
    Ok(())
}

/// Own keys first; derived keys are computed in passes until every target
/// they borrow from has a key.
fn derive_primary_keys(registry: &mut EntityRegistry, keys: &[EntityKey]) -> Result<()> {
    let mut pending: Vec<EntityKey> = Vec::new();
    for &key in keys {
        let Some(entity) = registry.resolve(key) else {
            continue;
        };
        if entity.relationships.iter().any(|r| r.id) {
            pending.push(key);
            continue;
        }
        let ids = own_ids(entity);
        let primary_key = PrimaryKey::from_ids(&entity.names.entity_class, ids, false);
        registry.get_mut_by_key(key)?.primary_key = primary_key;
    }

    while !pending.is_empty() {
        let mut progressed = false;
        let mut still_pending = Vec::new();
        for key in pending {
            let Some(entity) = registry.resolve(key) else {
                continue;
            };
            match derived_ids(entity, registry) {
                Some(derived) => {
                    let mut ids = own_ids(entity);
                    ids.extend(derived);
                    let primary_key = PrimaryKey::from_ids(&entity.names.entity_class, ids, true);
                    registry.get_mut_by_key(key)?.primary_key = primary_key;
                    progressed = true;
                }
                None => still_pending.push(key),
            }
        }
        if !progressed {
            let stuck = still_pending
                .first()
                .and_then(|&key| registry.resolve(key))
                .map(|entity| {
                    let relationship = entity
                        .relationships
                        .iter()
                        .find(|r| r.id)
                        .map(|r| r.relationship_name.clone())
                        .unwrap_or_default();
                    (entity.name.clone(), relationship)
                })
                .unwrap_or_default();
            return Err(Error::invalid_relationship(
                stuck.0,
                stuck.1,
                "id relationships form a cycle, no primary key can be derived",
            ));
        }
        pending = still_pending;
    }
    Ok(())
}

fn own_ids(entity: &Entity) -> Vec<PrimaryKeyId> {
    entity
        .fields
        .iter()
        .filter(|field| field.id)
        .map(|field| PrimaryKeyId::own(&field.field_name, field.field_type.clone(), field.auto_generate))
        .collect()
}

/// Ids borrowed through `id` relationships, or `None` while a target has no
/// key yet.
fn derived_ids(entity: &Entity, registry: &EntityRegistry) -> Option<Vec<PrimaryKeyId>> {
    let mut ids = Vec::new();
    for relationship in entity.relationships.iter().filter(|r| r.id) {
        let target = relationship.other_entity.and_then(|key| registry.resolve(key))?;
        let target_key = target.primary_key.as_ref()?;
        ids.extend(
            target_key
                .ids
                .iter()
                .map(|id| PrimaryKeyId::derived(&relationship.relationship_name, id)),
        );
    }
    Some(ids)
}

fn validate_many_to_many(registry: &EntityRegistry, keys: &[EntityKey]) -> Result<()> {
    let composite = |key: EntityKey| {
        registry
            .resolve(key)
            .and_then(|e| e.primary_key.as_ref())
            .is_some_and(|pk| pk.composite)
    };
    for &key in keys {
        let Some(entity) = registry.resolve(key) else {
            continue;
        };
        for relationship in &entity.relationships {
            if relationship.relationship_type != RelationshipType::ManyToMany {
                continue;
            }
            let other_composite = relationship.other_entity.is_some_and(composite);
            if composite(key) || other_composite {
                return Err(Error::invalid_relationship(
                    &entity.name,
                    &relationship.relationship_name,
                    "many-to-many relationships are not supported with composite primary keys",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApplicationConfig;
    use crate::model::{EntityDefinition, FieldDefinition};
    use crate::prepare::{configure_entities, load_entities, prepare_entities, prepare_fields};

    fn prepared(definitions: Vec<EntityDefinition>) -> Result<GenerationContext> {
        let config = ApplicationConfig {
            skip_user_management: true,
            ..ApplicationConfig::default()
        };
        let mut ctx = GenerationContext::with_definitions(config, definitions);
        configure_entities(&mut ctx)?;
        load_entities(&mut ctx)?;
        prepare_entities(&mut ctx)?;
        prepare_fields(&mut ctx)?;
        prepare_relationships(&mut ctx)?;
        Ok(ctx)
    }

    fn with_relationship(name: &str, relationship: RelationshipDefinition) -> EntityDefinition {
        let mut definition = EntityDefinition::named(name);
        definition.relationships.push(relationship);
        definition
    }

    #[test]
    fn test_defaults_and_resolution() {
        let ctx = prepared(vec![
            with_relationship(
                "Order",
                RelationshipDefinition::new(RelationshipType::ManyToOne, "Customer"),
            ),
            EntityDefinition::named("Customer"),
        ])
        .unwrap();

        let order = ctx.entities.get("Order").unwrap();
        let customer = &order.relationships[0];
        assert_eq!(customer.relationship_name, "customer");
        assert_eq!(customer.relationship_name_capitalized, "Customer");
        assert_eq!(customer.relationship_field_name_plural, "customers");
        assert_eq!(customer.other_entity_field, "id");
        assert!(customer.owner_side && !customer.collection);
        assert_eq!(customer.other_entity, ctx.entities.key_of("Customer"));
        assert!(ctx.entities.get("Customer").unwrap().relationships.is_empty());
    }

    #[test]
    fn test_inverse_is_synthesized_once() {
        let mut relationship = RelationshipDefinition::new(RelationshipType::ManyToOne, "Customer");
        relationship.other_entity_relationship_name = Some("orders".into());
        let ctx = prepared(vec![
            with_relationship("Order", relationship),
            EntityDefinition::named("Customer"),
        ])
        .unwrap();

        let customer = ctx.entities.get("Customer").unwrap();
        assert_eq!(customer.relationships.len(), 1);
        let orders = &customer.relationships[0];
        assert_eq!(orders.relationship_type, RelationshipType::OneToMany);
        assert_eq!(orders.relationship_name, "orders");
        assert_eq!(orders.other_entity_name, "Order");
        assert!(orders.synthesized && orders.collection && !orders.owner_side);
        // raw definition stays untouched
        assert!(customer.definition.relationships.is_empty());
    }

    #[test]
    fn test_unresolved_reference() {
        let error = prepared(vec![with_relationship(
            "Order",
            RelationshipDefinition::new(RelationshipType::ManyToOne, "Ghost"),
        )])
        .unwrap_err();
        assert!(matches!(
            error,
            Error::UnresolvedEntityReference { ref entity, ref other_entity, .. }
                if entity == "Order" && other_entity == "Ghost"
        ));
    }

    #[test]
    fn test_derived_primary_key() {
        let mut relationship = RelationshipDefinition::new(RelationshipType::OneToOne, "Customer");
        relationship.id = Some(true);
        relationship.relationship_name = Some("customer".into());
        let ctx = prepared(vec![
            with_relationship("Profile", relationship),
            EntityDefinition::named("Customer"),
        ])
        .unwrap();

        let profile = ctx.entities.get("Profile").unwrap();
        assert!(profile.fields.is_empty());
        let key = profile.primary_key.as_ref().unwrap();
        assert!(key.derived && !key.composite && !key.auto_generate);
        assert_eq!(key.name, "customerId");
        assert_eq!(key.key_type.name(), "Long");
        assert_eq!(key.ids[0].name_dotted, "customer.id");
    }

    #[test]
    fn test_invalid_id_relationship() {
        let mut relationship = RelationshipDefinition::new(RelationshipType::OneToMany, "Customer");
        relationship.id = Some(true);
        let error = prepared(vec![
            with_relationship("Profile", relationship),
            EntityDefinition::named("Customer"),
        ])
        .unwrap_err();
        assert!(matches!(error, Error::InvalidRelationship { .. }));
    }

    #[test]
    fn test_many_to_many_with_composite_key() {
        let mut enrollment = with_relationship(
            "Enrollment",
            RelationshipDefinition::new(RelationshipType::ManyToMany, "Course"),
        );
        for name in ["studentId", "term"] {
            enrollment.fields.push(FieldDefinition {
                id: Some(true),
                ..FieldDefinition::new(name, "Long")
            });
        }
        let error = prepared(vec![enrollment, EntityDefinition::named("Course")]).unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidRelationship { ref entity, ref relationship, .. }
                if entity == "Enrollment" && relationship == "course"
        ));
    }

    #[test]
    fn test_id_relationship_cycle() {
        let mut a = RelationshipDefinition::new(RelationshipType::ManyToOne, "B");
        a.id = Some(true);
        let mut b = RelationshipDefinition::new(RelationshipType::ManyToOne, "A");
        b.id = Some(true);
        let error = prepared(vec![with_relationship("A", a), with_relationship("B", b)]).unwrap_err();
        assert!(matches!(error, Error::InvalidRelationship { .. }));
    }
}
