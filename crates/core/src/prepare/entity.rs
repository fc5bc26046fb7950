use crate::config::{ApplicationConfig, ApplicationType};
use crate::context::GenerationContext;
use crate::error::Result;
use crate::model::naming::{camel, humanize, kebab, lower_first, pluralize, upper_first};
use crate::model::{Entity, EntityNames};

/// Compute the derived names of every registered entity.
///
/// # Errors
///
/// Returns [`crate::Error::EntityFrozen`] if an entity was already frozen.
pub fn prepare_entities(ctx: &mut GenerationContext) -> Result<()> {
    let keys: Vec<_> = ctx.entities.keys().collect();
    for key in keys {
        let entity = ctx.entities.get_mut_by_key(key)?;
        entity.names = entity_names(entity, &ctx.config);
        tracing::trace!(entity = %entity.name, api_url = %entity.names.entity_api_url, "Computed names");
    }
    Ok(())
}

/// Naming variants of an entity.
#[must_use]
pub fn entity_names(entity: &Entity, config: &ApplicationConfig) -> EntityNames {
    let name = &entity.name;
    let options = &entity.options;
    let capitalized = upper_first(name);
    let entity_class = capitalized.clone();
    let instance = lower_first(name);
    let suffix = options
        .angular_js_suffix
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| upper_first(&camel(s)))
        .unwrap_or_default();
    let root_folder = Some(options.client_root_folder.as_str()).filter(|f| !f.is_empty());

    let file_name = kebab(&format!("{capitalized}{suffix}"));
    let folder_name = root_folder.map_or_else(|| file_name.clone(), |root| format!("{root}/{file_name}"));
    let angular_name = format!("{entity_class}{suffix}");
    let state_name = kebab(&angular_name);
    let translation_key = root_folder.map_or_else(
        || instance.clone(),
        |root| camel(&format!("{root}-{instance}")),
    );
    let translation_key_menu = camel(&root_folder.map_or_else(
        || capitalized.clone(),
        |root| format!("{root}-{capitalized}"),
    ));
    let microservice = options
        .microservice_name
        .as_deref()
        .filter(|_| config.application_type == ApplicationType::Gateway);
    let frontend_app = config.frontend_app_name();
    let i18n_key_prefix = format!("{frontend_app}.{translation_key}");
    let i18n_alert_header_prefix = microservice.map_or_else(
        || i18n_key_prefix.clone(),
        |service| format!("{}.{translation_key}", camel(service)),
    );

    let persist_class = format!("{entity_class}{}", config.entity_suffix);
    let persist_instance = format!("{instance}{}", config.entity_suffix);
    let dto_class = format!("{entity_class}{}", config.dto_suffix);
    let dto_instance = format!("{instance}{}", config.dto_suffix);
    let dto = entity.strategies.dto_mapstruct;

    EntityNames {
        entity_name_plural: pluralize(name),
        entity_class_plural: pluralize(&entity_class),
        entity_class_humanized: humanize(&capitalized),
        entity_class_plural_humanized: humanize(&pluralize(&capitalized)),
        entity_instance_plural: lower_first(&pluralize(name)),
        entity_model_file_name: folder_name.clone(),
        entity_service_file_name: file_name.clone(),
        entity_folder_name: folder_name,
        entity_url: state_name.clone(),
        entity_api_url: kebab(&pluralize(name)),
        entity_state_name: state_name,
        entity_translation_key: translation_key,
        entity_translation_key_menu: translation_key_menu,
        entity_react_name: angular_name.clone(),
        entity_angular_name: angular_name,
        entity_api: microservice
            .map(|service| format!("services/{}/", service.to_lowercase()))
            .unwrap_or_default(),
        i18n_key_prefix,
        i18n_alert_header_prefix,
        rest_class: if dto { dto_class.clone() } else { persist_class.clone() },
        rest_instance: if dto { dto_instance.clone() } else { persist_instance.clone() },
        persist_class,
        persist_instance,
        dto_class,
        dto_instance,
        entity_file_name: file_name,
        entity_name_capitalized: capitalized,
        entity_class,
        entity_instance: instance,
    }
}
