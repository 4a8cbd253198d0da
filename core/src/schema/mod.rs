#![deny(missing_docs)]

//! # Type & Schema Resolver
//!
//! Turns a built [`Package`](crate::model::Package) into renderer-agnostic
//! schema definitions and per-method parameter lists.
//!
//! - [`definitions`]: one [`Definition`] per message and enum.
//! - [`routes`]: one [`Operation`] per method, with its parameter placement.

pub mod definitions;
pub mod routes;

pub use definitions::{resolve_definitions, Definitions};
pub use routes::{resolve_operations, Operation, Parameter, Placement};

use crate::descriptor::field_descriptor_proto::Type as FieldType;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Prefix of a local definition reference.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Primitive schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// `object`
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `file` (form uploads only)
    File,
}

/// A JSON-schema-like shape.
///
/// Exactly one of `reference`, `schema_type` is normally set: a reference
/// names another definition instead of embedding it, so the definition graph
/// may be cyclic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Definition {
    /// Schema type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Type format, e.g. `int64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Reference to another definition, e.g. `#/definitions/User`.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Enumerated value names.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Element schema of an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Definition>>,

    /// Object properties in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Definition>>,

    /// Value schema of a map.
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Definition>>,
}

impl Definition {
    /// A named reference to the definition `name`.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, name)),
            ..Default::default()
        }
    }

    /// A bare primitive.
    pub fn primitive(schema_type: SchemaType, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: format.map(str::to_string),
            ..Default::default()
        }
    }

    /// An array whose elements follow `items`.
    pub fn array(items: Definition) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// A map whose values follow `value`.
    pub fn map(value: Option<Definition>) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            additional_properties: value.map(Box::new),
            ..Default::default()
        }
    }

    /// Name of the referenced definition, if this is a local reference.
    pub fn reference_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
    }

    /// Whether this is an array schema.
    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array)
    }

    /// Whether this is an enum schema.
    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }
}

/// Fixed (type, format) pair of a scalar field type; `None` for message,
/// group and enum fields.
pub fn primitive(proto_type: FieldType) -> Option<(SchemaType, &'static str)> {
    let pair = match proto_type {
        FieldType::Bytes => (SchemaType::String, "bytes"),
        FieldType::String => (SchemaType::String, "string"),
        FieldType::Float => (SchemaType::Number, "float"),
        FieldType::Double => (SchemaType::Number, "double"),
        FieldType::Bool => (SchemaType::Boolean, "boolean"),
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => (SchemaType::Integer, "int32"),
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => (SchemaType::Integer, "int64"),
        FieldType::Uint32 | FieldType::Fixed32 => (SchemaType::Integer, "uint32"),
        FieldType::Uint64 | FieldType::Fixed64 => (SchemaType::Integer, "uint64"),
        FieldType::Message | FieldType::Group | FieldType::Enum => return None,
    };
    Some(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_reference_serializes_with_prefix() {
        let def = Definition::reference("User");
        assert_eq!(def.reference_name(), Some("User"));
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({"$ref": "#/definitions/User"})
        );
    }

    #[test]
    fn test_map_of_primitives() {
        let def = Definition::map(Some(Definition::primitive(SchemaType::String, Some("string"))));
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "type": "object",
                "additionalProperties": {"type": "string", "format": "string"}
            })
        );
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(primitive(FieldType::Int64), Some((SchemaType::Integer, "int64")));
        assert_eq!(primitive(FieldType::Bytes), Some((SchemaType::String, "bytes")));
        assert_eq!(primitive(FieldType::Fixed32), Some((SchemaType::Integer, "uint32")));
        assert_eq!(primitive(FieldType::Enum), None);
    }
}
