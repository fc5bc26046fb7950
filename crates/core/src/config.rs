//! Application configuration
//!
//! Read from the `generator-jhipster` key of `<project>/.yo-rc.json`. Every
//! recognised key has an explicit default; unknown keys are carried along.

use crate::error::{Error, Result};
use crate::merge::merge;
use crate::model::{FieldType, SearchEngine};
use crate::model::naming::camel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// File holding the application configuration.
pub const CONFIG_FILE: &str = ".yo-rc.json";

/// Key of the configuration inside [`CONFIG_FILE`].
pub const CONFIG_KEY: &str = "generator-jhipster";

/// Application-level configuration shared by every entity
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationConfig {
    /// Application name
    pub base_name: String,
    /// Deployment shape
    pub application_type: ApplicationType,
    /// Authentication scheme
    pub authentication_type: AuthenticationType,
    /// Development database family; decides the default primary key type
    pub database_type: DatabaseType,
    /// Production database
    pub prod_database_type: String,
    /// Client framework
    pub client_framework: String,
    /// Application-wide search engine
    pub search_engine: SearchEngine,
    /// Do not generate the built-in `User` entity
    pub skip_user_management: bool,
    /// Do not generate client code
    pub skip_client: bool,
    /// Do not generate server code
    pub skip_server: bool,
    /// Reactive stack
    pub reactive: bool,
    /// Prefix used for reserved table names
    pub jhi_prefix: String,
    /// Suffix of DTO classes
    pub dto_suffix: String,
    /// Suffix of entity classes
    pub entity_suffix: String,
    /// Generate i18n keys
    pub enable_translation: bool,
    /// Default language
    pub native_language: String,
    /// Declared entity order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<String>,
    /// Keys not modelled above, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            base_name: "jhipster".to_string(),
            application_type: ApplicationType::Monolith,
            authentication_type: AuthenticationType::Jwt,
            database_type: DatabaseType::Sql,
            prod_database_type: "postgresql".to_string(),
            client_framework: "angular".to_string(),
            search_engine: SearchEngine::No,
            skip_user_management: false,
            skip_client: false,
            skip_server: false,
            reactive: false,
            jhi_prefix: "jhi".to_string(),
            dto_suffix: "DTO".to_string(),
            entity_suffix: String::new(),
            enable_translation: true,
            native_language: "en".to_string(),
            entities: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Deployment shape
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    /// Single deployable
    #[default]
    Monolith,
    /// API gateway
    Gateway,
    /// Microservice behind a gateway
    Microservice,
}

/// Authentication scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationType {
    /// Stateless JWT
    #[default]
    Jwt,
    /// HTTP session
    Session,
    /// OAuth 2.0 / OIDC
    Oauth2,
}

/// Database family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Relational database
    #[default]
    Sql,
    /// MongoDB
    Mongodb,
    /// Cassandra
    Cassandra,
    /// Couchbase
    Couchbase,
    /// Neo4j
    Neo4j,
    /// No database
    No,
}

impl ApplicationConfig {
    /// Load the configuration of a project directory.
    ///
    /// A missing `.yo-rc.json`, or one without the `generator-jhipster` key,
    /// yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::io(e, Some(path.clone()), "reading configuration"))?;
        let document: Value =
            serde_json::from_str(&contents).map_err(|e| Error::json(e, Some(path.clone())))?;
        Self::from_document(&document).map_err(|e| match e {
            Error::Json { source, .. } => Error::json(source, Some(path)),
            other => other,
        })
    }

    /// Extract the configuration from a parsed `.yo-rc.json` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object or the
    /// configuration does not match the expected shape.
    pub fn from_document(document: &Value) -> Result<Self> {
        let Value::Object(root) = document else {
            return Err(Error::configuration(format!(
                "{CONFIG_FILE} must contain a JSON object"
            )));
        };
        match root.get(CONFIG_KEY) {
            Some(section) => Ok(serde_json::from_value(section.clone())?),
            None => Ok(Self::default()),
        }
    }

    /// Return a copy with `overrides` merged on top; keys in `overrides` win.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides are not an object or the merged
    /// result is not a valid configuration.
    pub fn merged_with(&self, overrides: &Value) -> Result<Self> {
        let base = serde_json::to_value(self)?;
        let merged = merge(&base, overrides)?;
        Ok(serde_json::from_value(merged)?)
    }

    /// Frontend application name: camel-cased base name plus `App`.
    #[must_use]
    pub fn frontend_app_name(&self) -> String {
        let mut name = camel(&self.base_name);
        if !self.base_name.ends_with("App") {
            name.push_str("App");
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name = format!("App{name}");
        }
        name
    }

    /// Primary key type used when an entity declares no id.
    #[must_use]
    pub const fn primary_key_type(&self) -> FieldType {
        match self.database_type {
            DatabaseType::Cassandra => FieldType::Uuid,
            DatabaseType::Mongodb | DatabaseType::Couchbase | DatabaseType::Neo4j => {
                FieldType::String
            }
            DatabaseType::Sql | DatabaseType::No => FieldType::Long,
        }
    }
}
