//! Derived primary keys.

use super::field_type::FieldType;
use serde::{Serialize, Serializer};

/// Storage type of a primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// A single identifier of the given type.
    Single(FieldType),
    /// Two or more identifiers.
    Composite,
}

impl PrimaryKeyType {
    /// Type name, `Composite` for multi-column keys.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Single(field_type) => field_type.name(),
            Self::Composite => "Composite",
        }
    }
}

impl Serialize for PrimaryKeyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One identifier of a primary key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKeyId {
    pub name: String,
    pub name_capitalized: String,
    pub getter: String,
    pub setter: String,
    pub name_dotted: String,
    pub name_dotted_asserted: String,
    /// Relationships traversed to reach the field, for derived ids.
    pub relationships_path: Vec<String>,
    pub auto_generate: bool,
    pub field_type: FieldType,
}

impl PrimaryKeyId {
    /// An id backed by a field of this entity.
    #[must_use]
    pub fn own(name: &str, field_type: FieldType, auto_generate: bool) -> Self {
        let capitalized = super::naming::upper_first(name);
        Self {
            name: name.to_string(),
            getter: format!("get{capitalized}"),
            setter: format!("set{capitalized}"),
            name_capitalized: capitalized,
            name_dotted: name.to_string(),
            name_dotted_asserted: format!("{name}!"),
            relationships_path: Vec::new(),
            auto_generate,
            field_type,
        }
    }

    /// An id borrowed from the target of an `id` relationship.
    #[must_use]
    pub fn derived(relationship_name: &str, other: &Self) -> Self {
        let name = format!(
            "{relationship_name}{}",
            super::naming::upper_first(&other.name)
        );
        let capitalized = super::naming::upper_first(&name);
        let mut relationships_path = vec![relationship_name.to_string()];
        relationships_path.extend(other.relationships_path.iter().cloned());
        Self {
            getter: format!("get{capitalized}"),
            setter: format!("set{capitalized}"),
            name_capitalized: capitalized,
            name_dotted: format!("{relationship_name}.{}", other.name_dotted),
            name_dotted_asserted: format!("{relationship_name}!.{}", other.name_dotted_asserted),
            name,
            relationships_path,
            auto_generate: false,
            field_type: other.field_type.clone(),
        }
    }
}

/// The primary key of a prepared entity.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKey {
    pub name: String,
    pub name_capitalized: String,
    #[serde(rename = "type")]
    pub key_type: PrimaryKeyType,
    pub ts_type: String,
    pub composite: bool,
    /// Borrowed from an `id` relationship.
    pub derived: bool,
    pub auto_generate: bool,
    pub has_long: bool,
    #[serde(rename = "hasUUID")]
    pub has_uuid: bool,
    pub type_long: bool,
    pub type_string: bool,
    #[serde(rename = "typeUUID")]
    pub type_uuid: bool,
    pub type_numeric: bool,
    pub ids: Vec<PrimaryKeyId>,
}

impl PrimaryKey {
    /// Build a key from its ids. More than one id makes it composite.
    ///
    /// Returns `None` when `ids` is empty.
    #[must_use]
    pub fn from_ids(entity_class: &str, ids: Vec<PrimaryKeyId>, derived: bool) -> Option<Self> {
        let first = ids.first()?;
        let composite = ids.len() > 1;
        let (name, key_type, ts_type) = if composite {
            (
                "id".to_string(),
                PrimaryKeyType::Composite,
                format!("{entity_class}Id"),
            )
        } else {
            (
                first.name.clone(),
                PrimaryKeyType::Single(first.field_type.clone()),
                first.field_type.ts_type().to_string(),
            )
        };
        let single = match &key_type {
            PrimaryKeyType::Single(field_type) => Some(field_type),
            PrimaryKeyType::Composite => None,
        };
        Some(Self {
            name_capitalized: super::naming::upper_first(&name),
            name,
            ts_type,
            composite,
            derived,
            auto_generate: !composite && !derived && first.auto_generate,
            has_long: ids.iter().any(|id| id.field_type == FieldType::Long),
            has_uuid: ids.iter().any(|id| id.field_type == FieldType::Uuid),
            type_long: single == Some(&FieldType::Long),
            type_string: single == Some(&FieldType::String),
            type_uuid: single == Some(&FieldType::Uuid),
            type_numeric: single.is_some_and(|t| {
                matches!(t, FieldType::Long | FieldType::Integer)
            }),
            key_type,
            ids,
        })
    }
}
