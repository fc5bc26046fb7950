//! Prepared entities.

use super::definition::{
    DtoStrategy, EntityDefinition, EntityOptions, PaginationStrategy, SearchEngine,
    ServiceStrategy,
};
use super::field::Field;
use super::primary_key::PrimaryKey;
use super::relationship::Relationship;
use crate::config::ApplicationConfig;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Entity options with every default applied.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub dto: DtoStrategy,
    pub pagination: PaginationStrategy,
    pub service: ServiceStrategy,
    pub fluent_methods: bool,
    pub jpa_metamodel_filtering: bool,
    pub read_only: bool,
    pub embedded: bool,
    pub search_engine: SearchEngine,
    pub skip_client: bool,
    pub skip_server: bool,
    pub client_root_folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_js_suffix: Option<String>,
}

impl ResolvedOptions {
    /// The defaults applied to every entity of an application.
    #[must_use]
    pub fn defaults(config: &ApplicationConfig) -> EntityOptions {
        EntityOptions {
            dto: Some(DtoStrategy::No),
            pagination: Some(PaginationStrategy::No),
            service: Some(ServiceStrategy::No),
            fluent_methods: Some(true),
            jpa_metamodel_filtering: Some(false),
            read_only: Some(false),
            embedded: Some(false),
            search_engine: Some(config.search_engine.clone()),
            skip_client: Some(config.skip_client),
            skip_server: Some(config.skip_server),
            client_root_folder: Some(String::new()),
            ..EntityOptions::default()
        }
    }

    /// Apply `defaults` to the explicit options, keeping explicit values.
    #[must_use]
    pub fn resolve(options: &EntityOptions, defaults: &EntityOptions) -> Self {
        let merged = options.with_defaults(defaults);
        Self {
            dto: merged.dto.unwrap_or(DtoStrategy::No),
            pagination: merged.pagination.unwrap_or(PaginationStrategy::No),
            service: merged.service.unwrap_or(ServiceStrategy::No),
            fluent_methods: merged.fluent_methods.unwrap_or(true),
            jpa_metamodel_filtering: merged.jpa_metamodel_filtering.unwrap_or(false),
            read_only: merged.read_only.unwrap_or(false),
            embedded: merged.embedded.unwrap_or(false),
            search_engine: merged.search_engine.unwrap_or_default(),
            skip_client: merged.skip_client.unwrap_or(false),
            skip_server: merged.skip_server.unwrap_or(false),
            client_root_folder: merged.client_root_folder.unwrap_or_default(),
            microservice_name: merged.microservice_name,
            angular_js_suffix: merged.angular_js_suffix,
        }
    }
}

/// Naming variants derived from the entity name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNames {
    pub entity_name_capitalized: String,
    pub entity_name_plural: String,
    pub entity_class: String,
    pub entity_class_plural: String,
    pub entity_class_humanized: String,
    pub entity_class_plural_humanized: String,
    pub entity_instance: String,
    pub entity_instance_plural: String,
    pub entity_file_name: String,
    pub entity_folder_name: String,
    pub entity_model_file_name: String,
    pub entity_service_file_name: String,
    pub entity_url: String,
    pub entity_api_url: String,
    pub entity_state_name: String,
    pub entity_translation_key: String,
    pub entity_translation_key_menu: String,
    pub entity_angular_name: String,
    pub entity_react_name: String,
    pub entity_api: String,
    pub i18n_key_prefix: String,
    pub i18n_alert_header_prefix: String,
    pub persist_class: String,
    pub persist_instance: String,
    pub rest_class: String,
    pub rest_instance: String,
    pub dto_class: String,
    pub dto_instance: String,
}

/// Strategy flags derived from the resolved options.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyFlags {
    pub pagination_no: bool,
    pub pagination_pagination: bool,
    pub pagination_infinite_scroll: bool,
    pub service_no: bool,
    pub service_impl: bool,
    pub dto_mapstruct: bool,
}

impl StrategyFlags {
    /// Derive the flags from resolved options.
    #[must_use]
    pub fn from_options(options: &ResolvedOptions) -> Self {
        Self {
            pagination_no: options.pagination == PaginationStrategy::No,
            pagination_pagination: options.pagination == PaginationStrategy::Pagination,
            pagination_infinite_scroll: options.pagination == PaginationStrategy::InfiniteScroll,
            service_no: options.service == ServiceStrategy::No,
            service_impl: options.service == ServiceStrategy::ServiceImpl,
            dto_mapstruct: options.dto == DtoStrategy::Mapstruct,
        }
    }
}

/// Entity-level aggregates over fields and relationships.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAggregates {
    pub fields_contain_big_decimal: bool,
    pub fields_contain_blob: bool,
    pub fields_contain_blob_or_image: bool,
    pub fields_contain_date: bool,
    pub fields_contain_duration: bool,
    pub fields_contain_embedded: bool,
    pub fields_contain_image_blob: bool,
    pub fields_contain_instant: bool,
    pub fields_contain_local_date: bool,
    pub fields_contain_many_to_one: bool,
    pub fields_contain_no_owner_one_to_one: bool,
    pub fields_contain_one_to_many: bool,
    pub fields_contain_owner_many_to_many: bool,
    pub fields_contain_owner_one_to_one: bool,
    pub fields_contain_text_blob: bool,
    #[serde(rename = "fieldsContainUUID")]
    pub fields_contain_uuid: bool,
    pub fields_contain_zoned_date_time: bool,
    pub have_field_with_javadoc: bool,
    /// Any field or relationship declares a validation rule.
    pub validation: bool,
    /// Names of binary fields.
    pub blob_fields: Vec<String>,
    /// Distinct field type names, in first-seen order.
    pub different_types: Vec<String>,
    /// Distinct related entity names, in first-seen order.
    pub other_entities: Vec<String>,
}

/// A prepared entity.
///
/// Built bare at loading time, then filled in by each preparing phase.
/// The raw definition is kept untouched for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(skip)]
    pub definition: EntityDefinition,
    pub entity_table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog_date_for_recent: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Provided by the generator, e.g. `User`.
    pub built_in: bool,
    pub built_in_user: bool,
    #[serde(flatten)]
    pub options: ResolvedOptions,
    #[serde(flatten)]
    pub strategies: StrategyFlags,
    #[serde(flatten)]
    pub names: EntityNames,
    pub fields: Vec<Field>,
    pub relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    #[serde(flatten)]
    pub aggregates: EntityAggregates,
}

impl Entity {
    /// A bare entity: name, table name and options only.
    #[must_use]
    pub fn bare(definition: EntityDefinition, options: ResolvedOptions, table_name: String) -> Self {
        Self {
            name: definition.name.clone(),
            entity_table_name: table_name,
            changelog_date: definition.changelog_date.clone(),
            changelog_date_for_recent: definition
                .changelog_date
                .as_deref()
                .and_then(parse_changelog_date),
            javadoc: definition.javadoc.clone(),
            built_in: false,
            built_in_user: false,
            strategies: StrategyFlags::from_options(&options),
            options,
            names: EntityNames::default(),
            fields: Vec::new(),
            relationships: Vec::new(),
            primary_key: None,
            aggregates: EntityAggregates::default(),
            definition,
        }
    }

    /// Look up a prepared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_name == name)
    }

    /// Look up a prepared relationship by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.relationship_name == name)
    }
}

/// Parse a `yyyyMMddHHmmss` changelog date.
#[must_use]
pub fn parse_changelog_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_changelog_date() {
        let parsed = parse_changelog_date("20220129025419").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2022-01-29T02:54:19+00:00");
        assert!(parse_changelog_date("yesterday").is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ApplicationConfig::default();
        let defaults = ResolvedOptions::defaults(&config);
        let resolved = ResolvedOptions::resolve(&EntityOptions::default(), &defaults);

        assert_eq!(resolved.dto, DtoStrategy::No);
        assert_eq!(resolved.pagination, PaginationStrategy::No);
        assert_eq!(resolved.service, ServiceStrategy::No);
        assert!(resolved.fluent_methods);
        assert!(!resolved.jpa_metamodel_filtering);

        let flags = StrategyFlags::from_options(&resolved);
        assert!(flags.pagination_no && flags.service_no && !flags.dto_mapstruct);
    }

    #[test]
    fn test_explicit_options_survive_resolution() {
        let config = ApplicationConfig::default();
        let options = EntityOptions {
            pagination: Some(PaginationStrategy::InfiniteScroll),
            jpa_metamodel_filtering: Some(true),
            ..EntityOptions::default()
        };
        let resolved = ResolvedOptions::resolve(&options, &ResolvedOptions::defaults(&config));

        assert_eq!(resolved.pagination, PaginationStrategy::InfiniteScroll);
        assert!(resolved.jpa_metamodel_filtering);
        assert!(StrategyFlags::from_options(&resolved).pagination_infinite_scroll);
    }
}
