//! Prepared relationships.

use super::definition::RelationshipType;
use crate::registry::EntityKey;
use serde::Serialize;

/// A relationship after the preparing-each-entity-relationship phase.
///
/// The target is held as an [`EntityKey`] into the run's registry rather
/// than a reference, since entities may be declared in any order.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub relationship_type: RelationshipType,
    pub relationship_name: String,
    pub relationship_name_capitalized: String,
    pub relationship_name_humanized: String,
    pub relationship_field_name: String,
    pub relationship_field_name_plural: String,
    pub other_entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,
    pub other_entity_field: String,
    /// Target entity, resolved against the registry.
    #[serde(skip)]
    pub other_entity: Option<EntityKey>,
    pub owner_side: bool,
    pub relationship_required: bool,
    /// This side holds a collection.
    pub collection: bool,
    /// Part of the primary key (MapsId style).
    pub id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Inverse side added because the target did not declare it.
    pub synthesized: bool,
}

impl Relationship {
    /// Whether this is the owner side of a one-to-one.
    #[must_use]
    pub fn is_owner_one_to_one(&self) -> bool {
        self.relationship_type == RelationshipType::OneToOne && self.owner_side
    }
}
