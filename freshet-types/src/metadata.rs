use serde::{Deserialize, Serialize};

/// Scalar type of a stream type property.
///
/// The hub defines many more codes; only the ones the client constructs are
/// modeled. Unrecognized codes fail deserialization loudly rather than being
/// silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TypeCode {
    /// ISO-8601 timestamp; the usual index property.
    DateTime,
    /// 64-bit float.
    Double,
    /// 64-bit signed integer.
    Int64,
    /// UTF-8 string.
    String,
}

/// One property of a stream type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeProperty {
    /// Property identifier (also its wire field name in event payloads).
    pub id: String,
    /// Whether this property is the stream's index key.
    #[serde(default)]
    pub is_key: bool,
    /// Scalar type of the property.
    pub type_code: TypeCode,
}

/// A stream type definition managed by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    /// Type identifier, unique within the namespace.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The type's properties; exactly one should be the key.
    pub properties: Vec<TypeProperty>,
}

impl TypeDef {
    /// A timestamp-keyed type with one `Double` value property, the shape
    /// used throughout the walkthroughs.
    pub fn timestamped_double(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: Some(id.clone()),
            id,
            properties: vec![
                TypeProperty {
                    id: "timestamp".into(),
                    is_key: true,
                    type_code: TypeCode::DateTime,
                },
                TypeProperty {
                    id: "value".into(),
                    is_key: false,
                    type_code: TypeCode::Double,
                },
            ],
        }
    }
}

/// A stream definition managed by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDef {
    /// Stream identifier, unique within the namespace.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifier of the stream's type.
    pub type_id: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StreamDef {
    /// Build a stream definition whose name mirrors its id.
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            type_id: type_id.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
