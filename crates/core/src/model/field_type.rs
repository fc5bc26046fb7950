//! Declared field types and the flags derived from them.

use serde::{Serialize, Serializer};
use std::fmt;

/// Content stored in a binary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobContent {
    /// Arbitrary binary content.
    Any,
    /// An image with a content type.
    Image,
    /// Large text.
    Text,
}

impl BlobContent {
    fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("any") => Some(Self::Any),
            Some("image") => Some(Self::Image),
            Some("text") => Some(Self::Text),
            Some(_) => None,
        }
    }
}

/// A field type, parsed once from its declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `String`
    String,
    /// `Integer`
    Integer,
    /// `Long`
    Long,
    /// `BigDecimal`
    BigDecimal,
    /// `Float`
    Float,
    /// `Double`
    Double,
    /// `Boolean`
    Boolean,
    /// `LocalDate`
    LocalDate,
    /// `ZonedDateTime`
    ZonedDateTime,
    /// `Instant`
    Instant,
    /// `Duration`
    Duration,
    /// `UUID`
    Uuid,
    /// `byte[]` and the `Blob`/`AnyBlob`/`ImageBlob`/`TextBlob` aliases
    Blob(BlobContent),
    /// `ByteBuffer`
    ByteBuffer(BlobContent),
    /// An enumeration declared with `fieldValues`
    Enum(String),
}

impl FieldType {
    /// Parse a declared type.
    ///
    /// Unknown names become an enumeration when `has_values` is set (the
    /// field declares `fieldValues`); otherwise `None` is returned.
    #[must_use]
    pub fn parse(declared: &str, blob_content: Option<&str>, has_values: bool) -> Option<Self> {
        let parsed = match declared {
            "String" => Self::String,
            "Integer" => Self::Integer,
            "Long" => Self::Long,
            "BigDecimal" => Self::BigDecimal,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "Boolean" => Self::Boolean,
            "LocalDate" => Self::LocalDate,
            "ZonedDateTime" => Self::ZonedDateTime,
            "Instant" => Self::Instant,
            "Duration" => Self::Duration,
            "UUID" => Self::Uuid,
            "byte[]" => Self::Blob(BlobContent::parse(blob_content)?),
            "Blob" | "AnyBlob" => Self::Blob(BlobContent::Any),
            "ImageBlob" => Self::Blob(BlobContent::Image),
            "TextBlob" => Self::Blob(BlobContent::Text),
            "ByteBuffer" => Self::ByteBuffer(BlobContent::parse(blob_content)?),
            other if has_values && is_type_name(other) => Self::Enum(other.to_string()),
            _ => return None,
        };
        Some(parsed)
    }

    /// The Java type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::BigDecimal => "BigDecimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::LocalDate => "LocalDate",
            Self::ZonedDateTime => "ZonedDateTime",
            Self::Instant => "Instant",
            Self::Duration => "Duration",
            Self::Uuid => "UUID",
            Self::Blob(_) => "byte[]",
            Self::ByteBuffer(_) => "ByteBuffer",
            Self::Enum(name) => name,
        }
    }

    /// The TypeScript type used by clients.
    #[must_use]
    pub fn ts_type(&self) -> &str {
        match self {
            Self::Integer | Self::Long | Self::BigDecimal | Self::Float | Self::Double => "number",
            Self::Boolean => "boolean",
            Self::LocalDate | Self::ZonedDateTime | Self::Instant => "dayjs.Dayjs",
            Self::Enum(name) => name,
            _ => "string",
        }
    }

    /// Blob content, for binary types.
    #[must_use]
    pub const fn blob_content(&self) -> Option<BlobContent> {
        match self {
            Self::Blob(content) | Self::ByteBuffer(content) => Some(*content),
            _ => None,
        }
    }

    /// Whether values of this type can be generated by the database.
    #[must_use]
    pub const fn is_auto_generatable(&self) -> bool {
        matches!(self, Self::Long | Self::Integer | Self::Uuid)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn is_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_alphabetic)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Boolean flags derived from a [`FieldType`].
///
/// Exactly one of the type family flags (`String` … `ByteBuffer`, plus
/// `fieldIsEnum`) is set for any type; the remaining flags are groupings.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldTypeFlags {
    #[serde(rename = "fieldTypeString")]
    pub string: bool,
    #[serde(rename = "fieldTypeInteger")]
    pub integer: bool,
    #[serde(rename = "fieldTypeLong")]
    pub long: bool,
    #[serde(rename = "fieldTypeBigDecimal")]
    pub big_decimal: bool,
    #[serde(rename = "fieldTypeFloat")]
    pub float: bool,
    #[serde(rename = "fieldTypeDouble")]
    pub double: bool,
    #[serde(rename = "fieldTypeBoolean")]
    pub boolean: bool,
    #[serde(rename = "fieldTypeLocalDate")]
    pub local_date: bool,
    #[serde(rename = "fieldTypeZonedDateTime")]
    pub zoned_date_time: bool,
    #[serde(rename = "fieldTypeInstant")]
    pub instant: bool,
    #[serde(rename = "fieldTypeDuration")]
    pub duration: bool,
    #[serde(rename = "fieldTypeUUID")]
    pub uuid: bool,
    #[serde(rename = "fieldTypeBytes")]
    pub bytes: bool,
    #[serde(rename = "fieldTypeByteBuffer")]
    pub byte_buffer: bool,
    #[serde(rename = "fieldTypeBlob")]
    pub blob: bool,
    #[serde(rename = "fieldTypeAnyBlob")]
    pub any_blob: bool,
    #[serde(rename = "fieldTypeImageBlob")]
    pub image_blob: bool,
    #[serde(rename = "fieldTypeTextBlob")]
    pub text_blob: bool,
    #[serde(rename = "fieldTypeBinary")]
    pub binary: bool,
    #[serde(rename = "fieldTypeCharSequence")]
    pub char_sequence: bool,
    #[serde(rename = "fieldTypeNumeric")]
    pub numeric: bool,
    #[serde(rename = "fieldTypeTemporal")]
    pub temporal: bool,
    #[serde(rename = "fieldTypeTimed")]
    pub timed: bool,
    #[serde(rename = "fieldIsEnum")]
    pub enumeration: bool,
}

/// Compute every type flag for a field type.
#[must_use]
pub fn derive_flags(field_type: &FieldType) -> FieldTypeFlags {
    let mut flags = FieldTypeFlags::default();
    match field_type {
        FieldType::String => {
            flags.string = true;
            flags.char_sequence = true;
        }
        FieldType::Integer => {
            flags.integer = true;
            flags.numeric = true;
        }
        FieldType::Long => {
            flags.long = true;
            flags.numeric = true;
        }
        FieldType::BigDecimal => {
            flags.big_decimal = true;
            flags.numeric = true;
        }
        FieldType::Float => {
            flags.float = true;
            flags.numeric = true;
        }
        FieldType::Double => {
            flags.double = true;
            flags.numeric = true;
        }
        FieldType::Boolean => flags.boolean = true,
        FieldType::LocalDate => {
            flags.local_date = true;
            flags.temporal = true;
        }
        FieldType::ZonedDateTime => {
            flags.zoned_date_time = true;
            flags.temporal = true;
            flags.timed = true;
        }
        FieldType::Instant => {
            flags.instant = true;
            flags.temporal = true;
            flags.timed = true;
        }
        FieldType::Duration => flags.duration = true,
        FieldType::Uuid => flags.uuid = true,
        FieldType::Blob(content) => {
            flags.blob = true;
            if *content != BlobContent::Text {
                flags.bytes = true;
                flags.binary = true;
            }
            set_content(&mut flags, *content);
        }
        FieldType::ByteBuffer(content) => {
            flags.byte_buffer = true;
            flags.binary = true;
            set_content(&mut flags, *content);
        }
        FieldType::Enum(_) => flags.enumeration = true,
    }
    flags
}

fn set_content(flags: &mut FieldTypeFlags, content: BlobContent) {
    match content {
        BlobContent::Any => flags.any_blob = true,
        BlobContent::Image => flags.image_blob = true,
        BlobContent::Text => flags.text_blob = true,
    }
}

impl FieldTypeFlags {
    /// The type family flags; exactly one of them is set.
    #[must_use]
    pub const fn families(&self) -> [bool; 15] {
        [
            self.string,
            self.integer,
            self.long,
            self.big_decimal,
            self.float,
            self.double,
            self.boolean,
            self.local_date,
            self.zoned_date_time,
            self.instant,
            self.duration,
            self.uuid,
            self.blob,
            self.byte_buffer,
            self.enumeration,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const ALL: &[&str] = &[
        "String",
        "Integer",
        "Long",
        "BigDecimal",
        "Float",
        "Double",
        "Boolean",
        "LocalDate",
        "ZonedDateTime",
        "Instant",
        "Duration",
        "UUID",
        "byte[]",
        "AnyBlob",
        "ImageBlob",
        "TextBlob",
        "ByteBuffer",
    ];

    #[test]
    fn test_parse_known_types() {
        for name in ALL {
            assert!(FieldType::parse(name, None, false).is_some(), "{name}");
        }
        assert_eq!(FieldType::parse("UUID", None, false), Some(FieldType::Uuid));
        assert_eq!(
            FieldType::parse("byte[]", Some("image"), false),
            Some(FieldType::Blob(BlobContent::Image))
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        assert_eq!(FieldType::parse("Money", None, false), None);
        assert_eq!(
            FieldType::parse("Language", None, true),
            Some(FieldType::Enum("Language".into()))
        );
        assert_eq!(FieldType::parse("byte[]", Some("video"), false), None);
    }

    #[test]
    fn test_exactly_one_family_per_type() {
        for name in ALL {
            let field_type = FieldType::parse(name, None, false).unwrap();
            let flags = derive_flags(&field_type);
            let set = flags.families().iter().filter(|f| **f).count();
            assert_eq!(set, 1, "{name} sets {set} family flags");
        }
        let flags = derive_flags(&FieldType::Enum("Language".into()));
        assert_eq!(flags.families().iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn test_uuid_sets_only_uuid() {
        let flags = serde_json::to_value(derive_flags(&FieldType::Uuid)).unwrap();
        let Value::Object(map) = flags else {
            panic!("flags serialize to an object");
        };
        for (key, value) in map {
            assert_eq!(value, Value::Bool(key == "fieldTypeUUID"), "{key}");
        }
    }

    #[test]
    fn test_grouping_flags() {
        let long = derive_flags(&FieldType::Long);
        assert!(long.long && long.numeric && !long.temporal);

        let instant = derive_flags(&FieldType::Instant);
        assert!(instant.temporal && instant.timed);

        let date = derive_flags(&FieldType::LocalDate);
        assert!(date.temporal && !date.timed);

        let text = derive_flags(&FieldType::Blob(BlobContent::Text));
        assert!(text.blob && text.text_blob && !text.bytes && !text.binary);

        let image = derive_flags(&FieldType::Blob(BlobContent::Image));
        assert!(image.bytes && image.binary && image.image_blob);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::Uuid.to_string(), "UUID");
        assert_eq!(FieldType::Blob(BlobContent::Any).name(), "byte[]");
        assert_eq!(FieldType::Long.ts_type(), "number");
        assert_eq!(FieldType::Uuid.ts_type(), "string");
    }
}
