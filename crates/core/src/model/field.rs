//! Prepared fields.

use super::field_type::{FieldType, FieldTypeFlags};
use serde::Serialize;
use serde_json::Value;

/// Flags derived from the declared validation rules.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFlags {
    /// Any rule is declared.
    pub field_validate: bool,
    /// `required`
    pub field_validation_required: bool,
    /// `unique`
    pub field_validation_unique: bool,
    /// `minlength`
    pub field_validation_min_length: bool,
    /// `maxlength`
    pub field_validation_max_length: bool,
    /// `pattern`
    pub field_validation_pattern: bool,
    /// `min`
    pub field_validation_min: bool,
    /// `max`
    pub field_validation_max: bool,
    /// `minbytes`
    pub field_validation_min_bytes: bool,
    /// `maxbytes`
    pub field_validation_max_bytes: bool,
}

impl ValidationFlags {
    /// Derive the flags from rule names.
    #[must_use]
    pub fn from_rules(rules: &[String]) -> Self {
        let has = |rule: &str| rules.iter().any(|r| r == rule);
        Self {
            field_validate: !rules.is_empty(),
            field_validation_required: has("required"),
            field_validation_unique: has("unique"),
            field_validation_min_length: has("minlength"),
            field_validation_max_length: has("maxlength"),
            field_validation_pattern: has("pattern"),
            field_validation_min: has("min"),
            field_validation_max: has("max"),
            field_validation_min_bytes: has("minbytes"),
            field_validation_max_bytes: has("maxbytes"),
        }
    }
}

/// A field after the preparing-each-entity-field phase.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_name: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Parsed enum values, for enumerations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    pub field_name_capitalized: String,
    pub field_name_underscored: String,
    pub field_name_humanized: String,
    pub field_in_java_bean_method: String,
    pub column_name: String,
    pub field_translation_key: String,
    pub ts_type: String,
    /// Part of the primary key.
    pub id: bool,
    pub auto_generate: bool,
    pub readonly: bool,
    pub nullable: bool,
    pub unique: bool,
    /// Added by the generator rather than declared.
    pub built_in: bool,
    pub blob_content_type_any: bool,
    pub blob_content_type_image: bool,
    pub blob_content_type_text: bool,
    /// Image and arbitrary blobs carry a companion content-type column.
    pub field_with_content_type: bool,
    #[serde(flatten)]
    pub type_flags: FieldTypeFlags,
    #[serde(flatten)]
    pub validation: ValidationFlags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_validate_rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minlength: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxlength: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_min: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_max: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_minbytes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules_maxbytes: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_flags_from_rules() {
        let flags = ValidationFlags::from_rules(&["required".into(), "maxlength".into()]);
        assert!(flags.field_validate);
        assert!(flags.field_validation_required);
        assert!(flags.field_validation_max_length);
        assert!(!flags.field_validation_unique);

        assert_eq!(ValidationFlags::from_rules(&[]), ValidationFlags::default());
    }
}
