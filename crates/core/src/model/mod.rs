//! Entity data model: raw definitions as read from disk and the prepared
//! entities computed from them.

pub mod definition;
pub mod entity;
pub mod field;
pub mod field_type;
pub mod naming;
pub mod primary_key;
pub mod relationship;

pub use definition::{
    CustomSecurity, DtoStrategy, EntityDefinition, EntityOptions, EntitySecurity,
    FieldDefinition, PaginationStrategy, RelationshipDefinition, RelationshipType, RoleSecurity,
    SearchEngine, ServiceStrategy,
};
pub use entity::{Entity, EntityAggregates, EntityNames, ResolvedOptions, StrategyFlags};
pub use field::{Field, ValidationFlags};
pub use field_type::{BlobContent, FieldType, FieldTypeFlags, derive_flags};
pub use primary_key::{PrimaryKey, PrimaryKeyId, PrimaryKeyType};
pub use relationship::Relationship;
