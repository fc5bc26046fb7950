//! Raw entity definitions as authored in `.jhipster/<Entity>.json`.
//!
//! These types keep the on-disk keys and never carry derived data, so a
//! definition can be written back as a canonical snapshot. Keys this crate
//! does not model are kept in `extra` maps and survive the round trip.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A raw entity definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    /// Entity name. Readers default it from the file name when absent.
    #[serde(default)]
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Relationships in declaration order.
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
    /// Free-text documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Creation timestamp, `yyyyMMddHHmmss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_date: Option<String>,
    /// Explicit table name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_table_name: Option<String>,
    /// Entity-level options.
    #[serde(flatten)]
    pub options: EntityOptions,
}

impl EntityDefinition {
    /// Create an empty definition with a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether any relationship is marked as part of the primary key.
    #[must_use]
    pub fn has_id_relationship(&self) -> bool {
        self.relationships.iter().any(|r| r.id == Some(true))
    }

    /// Whether any field is marked as, or named, the identifier.
    #[must_use]
    pub fn has_id_field(&self) -> bool {
        self.fields.iter().any(FieldDefinition::is_id)
    }
}

/// Entity-level options. Every option is optional; defaults are applied
/// during the configuring-each-entity phase and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityOptions {
    /// DTO strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dto: Option<DtoStrategy>,
    /// Pagination strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationStrategy>,
    /// Service strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceStrategy>,
    /// JPA metamodel filtering. `"no"` reads as `false`.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub jpa_metamodel_filtering: Option<bool>,
    /// Generate fluent setters.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub fluent_methods: Option<bool>,
    /// Read-only entity.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub read_only: Option<bool>,
    /// Embedded entity.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub embedded: Option<bool>,
    /// Search engine, or `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<SearchEngine>,
    /// Client folder the entity is grouped under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_root_folder: Option<String>,
    /// Owning microservice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    /// Angular state suffix.
    #[serde(
        default,
        rename = "angularJSSuffix",
        skip_serializing_if = "Option::is_none"
    )]
    pub angular_js_suffix: Option<String>,
    /// Skip client code for this entity.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub skip_client: Option<bool>,
    /// Skip server code for this entity.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub skip_server: Option<bool>,
    /// Security settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<EntitySecurity>,
    /// Unmodelled keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EntityOptions {
    /// Fill every absent option from `defaults`. Explicit values are kept.
    #[must_use]
    pub fn with_defaults(&self, defaults: &Self) -> Self {
        let mut extra = defaults.extra.clone();
        extra.extend(self.extra.clone());
        Self {
            dto: self.dto.or(defaults.dto),
            pagination: self.pagination.or(defaults.pagination),
            service: self.service.or(defaults.service),
            jpa_metamodel_filtering: self
                .jpa_metamodel_filtering
                .or(defaults.jpa_metamodel_filtering),
            fluent_methods: self.fluent_methods.or(defaults.fluent_methods),
            read_only: self.read_only.or(defaults.read_only),
            embedded: self.embedded.or(defaults.embedded),
            search_engine: self
                .search_engine
                .clone()
                .or_else(|| defaults.search_engine.clone()),
            client_root_folder: self
                .client_root_folder
                .clone()
                .or_else(|| defaults.client_root_folder.clone()),
            microservice_name: self
                .microservice_name
                .clone()
                .or_else(|| defaults.microservice_name.clone()),
            angular_js_suffix: self
                .angular_js_suffix
                .clone()
                .or_else(|| defaults.angular_js_suffix.clone()),
            skip_client: self.skip_client.or(defaults.skip_client),
            skip_server: self.skip_server.or(defaults.skip_server),
            secure: self.secure.clone().or_else(|| defaults.secure.clone()),
            extra,
        }
    }
}

/// DTO generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtoStrategy {
    /// No DTOs.
    No,
    /// MapStruct mapped DTOs.
    Mapstruct,
}

/// Pagination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationStrategy {
    /// No pagination.
    No,
    /// Pager links.
    Pagination,
    /// Infinite scrolling.
    InfiniteScroll,
}

/// Service layer strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceStrategy {
    /// Repositories are used directly.
    No,
    /// A service class.
    ServiceClass,
    /// A service interface plus implementation.
    ServiceImpl,
}

/// Search engine selection. Serialised as `false` when disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SearchEngineRepr", into = "SearchEngineRepr")]
pub enum SearchEngine {
    /// No search engine.
    #[default]
    No,
    /// A named engine such as `elasticsearch`.
    Engine(String),
}

impl SearchEngine {
    /// Whether a search engine is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Engine(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SearchEngineRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<SearchEngineRepr> for SearchEngine {
    type Error = String;

    fn try_from(repr: SearchEngineRepr) -> Result<Self, Self::Error> {
        match repr {
            SearchEngineRepr::Flag(false) => Ok(Self::No),
            SearchEngineRepr::Flag(true) => {
                Err("searchEngine must name an engine, not `true`".to_string())
            }
            SearchEngineRepr::Name(name) if name == "no" || name.is_empty() => Ok(Self::No),
            SearchEngineRepr::Name(name) => Ok(Self::Engine(name)),
        }
    }
}

impl From<SearchEngine> for SearchEngineRepr {
    fn from(engine: SearchEngine) -> Self {
        match engine {
            SearchEngine::No => Self::Flag(false),
            SearchEngine::Engine(name) => Self::Name(name),
        }
    }
}

/// Access control settings of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySecurity {
    /// `roles`, `privileges` or a custom type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_type: Option<String>,
    /// Role based rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleSecurity>,
    /// Privilege based rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_security: Vec<CustomSecurity>,
    /// Unmodelled keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Actions a role may perform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSecurity {
    /// The role name.
    pub role: String,
    /// Permitted actions, in declared order.
    #[serde(default)]
    pub action_list: Vec<String>,
}

/// Privileges required for an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSecurity {
    /// The guarded action.
    pub action: String,
    /// Required privileges, in declared order.
    #[serde(default)]
    pub priv_list: Vec<String>,
}

/// A raw field definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name.
    pub field_name: String,
    /// Declared type, e.g. `String`, `UUID`, `byte[]` or an enum name.
    pub field_type: String,
    /// Free-text documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Comma separated enum values; presence makes the type an enum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    /// Blob content: `image`, `any` or `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<String>,
    /// Validation rule names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_validate_rules: Vec<String>,
    /// `minlength` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minlength: Option<Value>,
    /// `maxlength` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxlength: Option<Value>,
    /// `pattern` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_pattern: Option<String>,
    /// `min` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_min: Option<Value>,
    /// `max` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_max: Option<Value>,
    /// `minbytes` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minbytes: Option<Value>,
    /// `maxbytes` rule value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxbytes: Option<Value>,
    /// Marks the field as (part of) the primary key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<bool>,
    /// Unmodelled keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldDefinition {
    /// Create a field with a name and declared type.
    #[must_use]
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    /// Whether this field belongs to the primary key.
    ///
    /// An explicit `id` flag wins; otherwise a field named `id` is the key.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.id.unwrap_or(self.field_name == "id")
    }

    /// Whether a validation rule is declared.
    #[must_use]
    pub fn has_rule(&self, rule: &str) -> bool {
        self.field_validate_rules.iter().any(|r| r == rule)
    }
}

/// A raw relationship definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDefinition {
    /// Cardinality.
    pub relationship_type: RelationshipType,
    /// Relationship name; defaults to the lower-first other entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<String>,
    /// Target entity name.
    pub other_entity_name: String,
    /// Name of the inverse relationship on the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,
    /// Field of the target displayed in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_field: Option<String>,
    /// Whether this side owns the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_side: Option<bool>,
    /// `"required"` or a list of rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_validate_rules: Option<Value>,
    /// Free-text documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Marks the relationship as part of the primary key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<bool>,
    /// Unmodelled keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RelationshipDefinition {
    /// Create a relationship to another entity.
    #[must_use]
    pub fn new(relationship_type: RelationshipType, other_entity_name: impl Into<String>) -> Self {
        Self {
            relationship_type,
            relationship_name: None,
            other_entity_name: other_entity_name.into(),
            other_entity_relationship_name: None,
            other_entity_field: None,
            owner_side: None,
            relationship_validate_rules: None,
            javadoc: None,
            id: None,
            extra: BTreeMap::new(),
        }
    }

    /// Whether the `required` rule is declared.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match &self.relationship_validate_rules {
            Some(Value::String(rule)) => rule == "required",
            Some(Value::Array(rules)) => rules.iter().any(|r| r.as_str() == Some("required")),
            _ => false,
        }
    }
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    /// `one-to-one`
    OneToOne,
    /// `one-to-many`
    OneToMany,
    /// `many-to-one`
    ManyToOne,
    /// `many-to-many`
    ManyToMany,
}

impl RelationshipType {
    /// The cardinality seen from the other side.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::OneToOne => Self::OneToOne,
            Self::OneToMany => Self::ManyToOne,
            Self::ManyToOne => Self::OneToMany,
            Self::ManyToMany => Self::ManyToMany,
        }
    }

    /// Whether this side holds a collection.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    /// The kebab-case name used on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

/// Accept booleans plus the `"no"`/`"yes"` strings older definitions use.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Bool(bool),
        Text(String),
    }

    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Bool(value)) => Ok(Some(value)),
        Some(Lenient::Text(text)) => match text.as_str() {
            "no" | "false" => Ok(Some(false)),
            "yes" | "true" => Ok(Some(true)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean or \"no\", found \"{other}\""
            ))),
        },
    }
}
