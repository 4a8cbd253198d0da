//! # Definitions
//!
//! Resolves every message and enum of a package into a [`Definition`].
//!
//! Messages are resolved on demand the first time a field references them and
//! memoized, so each type is resolved at most once even under mutual reference.
//! Map-entry messages never get a standalone definition; fields referring to
//! them become `additionalProperties` schemas.

use super::{primitive, Definition, SchemaType};
use crate::model::{Enum, MessageField, Package};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Definitions keyed by type name, sorted by name.
pub type Definitions = IndexMap<String, Definition>;

/// Resolves all definitions of `package`.
pub fn resolve_definitions(package: &Package) -> Definitions {
    let mut resolver = DefinitionResolver::new(package);

    for def in package.enums.values() {
        resolver.resolve_enum(def);
    }
    for name in package.messages.keys() {
        resolver.resolve_message(name);
    }

    let mut definitions = resolver.definitions;
    definitions.sort_keys();
    definitions
}

struct DefinitionResolver<'a> {
    package: &'a Package,
    definitions: Definitions,
    entries: HashSet<&'a str>,
    in_progress: HashSet<String>,
}

impl<'a> DefinitionResolver<'a> {
    fn new(package: &'a Package) -> Self {
        let entries = package
            .messages
            .values()
            .flat_map(|m| m.fields.iter())
            .filter(|f| f.is_entry())
            .map(|f| f.proto_type_name.as_str())
            .collect();

        Self {
            package,
            definitions: IndexMap::new(),
            entries,
            in_progress: HashSet::new(),
        }
    }

    fn resolve_enum(&mut self, def: &Enum) {
        let values: Vec<String> = def.fields.iter().map(|f| f.name.clone()).collect();
        let definition = Definition {
            schema_type: Some(SchemaType::String),
            description: def.description.clone(),
            default: values.first().cloned().map(Value::from),
            enum_values: Some(values),
            ..Default::default()
        };
        self.definitions.insert(def.name.clone(), definition);
    }

    fn resolve_message(&mut self, name: &str) {
        if self.entries.contains(name)
            || self.definitions.contains_key(name)
            || self.in_progress.contains(name)
        {
            return;
        }
        let package = self.package;
        let Some(message) = package.message(name) else {
            debug!(message = name, "referenced message is not declared");
            return;
        };

        self.in_progress.insert(name.to_string());
        let properties = message
            .fields
            .iter()
            .map(|f| (f.json_name().to_string(), self.field_schema(f)))
            .collect();
        self.in_progress.remove(name);

        self.definitions.insert(
            name.to_string(),
            Definition {
                schema_type: Some(SchemaType::Object),
                description: message.description.clone(),
                properties: Some(properties),
                ..Default::default()
            },
        );
    }

    /// Element schema first, then the array wrapper for repeated fields.
    fn field_schema(&mut self, field: &MessageField) -> Definition {
        let mut schema = if let Some((schema_type, format)) = primitive(field.proto_type) {
            Definition::primitive(schema_type, Some(format))
        } else if field.is_enum() {
            Definition::reference(&field.proto_type_name)
        } else if field.is_entry() {
            let package = self.package;
            let value = package
                .message(&field.proto_type_name)
                .and_then(|entry| entry.field("value"))
                .map(|value| self.element_schema(value));
            Definition::map(value)
        } else {
            self.resolve_message(&field.proto_type_name);
            Definition::reference(&field.proto_type_name)
        };

        if schema.reference.is_none() {
            schema.description = field.description.clone();
        }

        if field.is_repeated() {
            Definition {
                description: field.description.clone(),
                ..Definition::array(schema)
            }
        } else {
            schema
        }
    }

    /// Schema of a map value, which is never repeated itself.
    fn element_schema(&mut self, field: &MessageField) -> Definition {
        if let Some((schema_type, format)) = primitive(field.proto_type) {
            return Definition::primitive(schema_type, Some(format));
        }
        if field.is_message() {
            self.resolve_message(&field.proto_type_name);
        }
        Definition::reference(&field.proto_type_name)
    }
}
