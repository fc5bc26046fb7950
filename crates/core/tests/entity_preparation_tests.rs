//! End-to-end entity preparation through the scheduler.

use entigen_core::model::{
    FieldType, PrimaryKeyType, RelationshipDefinition, RelationshipType,
};
use entigen_core::prepare::{BootstrapGenerator, USER_ENTITY};
use entigen_core::snapshot::{from_canonical_str, to_canonical_string};
use entigen_core::{
    ApplicationConfig, EntityDefinition, FieldDefinition, GenerationContext, Scheduler,
};
use entigen_core::equality::definitions_equal;
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

async fn prepare(
    config: ApplicationConfig,
    definitions: Vec<EntityDefinition>,
) -> entigen_core::Result<GenerationContext> {
    let mut scheduler = Scheduler::standard()?;
    scheduler.compose(Arc::new(BootstrapGenerator))?;
    let mut ctx = GenerationContext::with_definitions(config, definitions);
    scheduler.run(&mut ctx).await?;
    Ok(ctx)
}

fn without_users() -> ApplicationConfig {
    ApplicationConfig {
        skip_user_management: true,
        ..ApplicationConfig::default()
    }
}

fn entity_a() -> EntityDefinition {
    let mut definition = EntityDefinition::named("EntityA");
    definition.changelog_date = Some("20220129025419".into());
    definition.fields.push(FieldDefinition::new("id", "UUID"));
    definition
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_uuid_primary_key() {
    let ctx = prepare(without_users(), vec![entity_a()]).await.unwrap();
    let entity = ctx.entities.get("EntityA").unwrap();

    let key = entity.primary_key.as_ref().unwrap();
    assert_eq!(key.name, "id");
    assert_eq!(key.key_type, PrimaryKeyType::Single(FieldType::Uuid));
    assert_eq!(key.key_type.name(), "UUID");
    assert!(!key.composite && !key.derived);
    assert!(key.type_uuid && key.has_uuid && !key.type_long);
    assert_eq!(key.ts_type, "string");

    let id = &entity.fields[0];
    assert_eq!(entity.fields.len(), 1);
    assert!(id.id && id.auto_generate);
    assert!(id.type_flags.uuid);
    assert!(!id.type_flags.string && !id.type_flags.long && !id.type_flags.numeric);
    assert!(entity.aggregates.fields_contain_uuid);

    assert_eq!(entity.names.entity_file_name, "entity-a");
    assert_eq!(entity.entity_table_name, "entitya");
    assert!(ctx.entities.is_frozen("EntityA"));
}

#[tokio::test]
async fn test_order_customer_resolution() {
    let mut order = EntityDefinition::named("Order");
    order.fields.push(FieldDefinition::new("total", "BigDecimal"));
    let mut customer = RelationshipDefinition::new(RelationshipType::ManyToOne, "Customer");
    customer.other_entity_relationship_name = Some("orders".into());
    customer.relationship_validate_rules = Some("required".into());
    order.relationships.push(customer);

    let mut customer = EntityDefinition::named("Customer");
    customer.fields.push(FieldDefinition::new("name", "String"));

    let ctx = prepare(without_users(), vec![order, customer]).await.unwrap();

    let order = ctx.entities.get("Order").unwrap();
    assert_eq!(order.entity_table_name, "jhi_order");
    let relationship = order.relationship("customer").unwrap();
    let target = relationship
        .other_entity
        .and_then(|key| ctx.entities.resolve(key))
        .unwrap();
    assert_eq!(target.name, "Customer");
    assert!(relationship.owner_side && relationship.relationship_required);
    assert!(order.aggregates.validation);

    let customer = ctx.entities.get("Customer").unwrap();
    let inverse = customer.relationship("orders").unwrap();
    assert!(inverse.synthesized && !inverse.owner_side && inverse.collection);
    assert_eq!(inverse.relationship_type, RelationshipType::OneToMany);
    assert!(customer.aggregates.fields_contain_one_to_many);
    assert_eq!(customer.aggregates.other_entities, vec!["Order"]);
}

#[tokio::test]
async fn test_user_is_registered_first() {
    let ctx = prepare(ApplicationConfig::default(), vec![entity_a()])
        .await
        .unwrap();

    let names: Vec<_> = ctx.entities.names().collect();
    assert_eq!(names, vec![USER_ENTITY, "EntityA"]);
    let user = ctx.entities.get(USER_ENTITY).unwrap();
    assert!(user.built_in && user.built_in_user);
    assert_eq!(user.entity_table_name, "jhi_user");
    assert!(user.field("login").is_some_and(|f| f.built_in && !f.nullable));

    let ctx = prepare(without_users(), vec![entity_a()]).await.unwrap();
    assert!(ctx.entities.get(USER_ENTITY).is_none());
    assert_eq!(ctx.entities.len(), 1);
}

#[tokio::test]
async fn test_supplied_user_is_merged_into_built_in() {
    let mut user = EntityDefinition::named(USER_ENTITY);
    user.fields.push(FieldDefinition::new("nickname", "String"));

    let ctx = prepare(ApplicationConfig::default(), vec![user]).await.unwrap();
    assert_eq!(ctx.entities.len(), 1);
    let user = ctx.entities.get(USER_ENTITY).unwrap();
    assert!(user.built_in_user);
    assert!(user.field("login").is_some());
    assert!(user.field("nickname").is_some_and(|f| f.nullable));
    assert_eq!(user.fields.len(), 9);
}

#[tokio::test]
async fn test_composite_key() {
    let mut enrollment = EntityDefinition::named("Enrollment");
    for name in ["studentId", "courseId"] {
        enrollment.fields.push(FieldDefinition {
            id: Some(true),
            ..FieldDefinition::new(name, "Long")
        });
    }

    let ctx = prepare(without_users(), vec![enrollment]).await.unwrap();
    let key = ctx
        .entities
        .get("Enrollment")
        .and_then(|e| e.primary_key.as_ref())
        .unwrap();

    assert!(key.composite && !key.auto_generate);
    assert_eq!(key.key_type.name(), "Composite");
    assert_eq!(key.ts_type, "EnrollmentId");
    assert_eq!(key.ids.len(), 2);
    assert!(key.has_long && !key.type_long);
}

#[tokio::test]
async fn test_definitions_survive_preparation_unchanged() {
    let mut order = EntityDefinition::named("Order");
    order.fields.push(FieldDefinition::new("total", "BigDecimal"));
    order
        .relationships
        .push(RelationshipDefinition::new(RelationshipType::ManyToOne, "Customer"));
    let definitions = vec![order, EntityDefinition::named("Customer")];

    let ctx = prepare(without_users(), definitions.clone()).await.unwrap();

    for original in &definitions {
        let prepared = &ctx.entities.get(&original.name).unwrap().definition;
        let snapshot = to_canonical_string(prepared).unwrap();
        let reread = from_canonical_str(&snapshot).unwrap();
        assert!(definitions_equal(original, &reread).unwrap());
        // defaults never reach the snapshot
        assert!(!snapshot.contains("pagination"));
        assert!(!snapshot.contains("otherEntityRelationshipName"));
    }
}
