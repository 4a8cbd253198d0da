#![deny(missing_docs)]

//! # Example Synthesizer
//!
//! Materializes a representative JSON payload for a message.
//!
//! Every call keeps its own visit counter keyed by `<owning message>.<field>`.
//! A message-typed field position is expanded at most twice per call; the third
//! visit yields `null`, so self-referential and mutually recursive messages
//! always terminate.

use crate::error::AppResult;
use crate::model::{JsonType, Message, MessageField, Package};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Expansions allowed per field position before it collapses to `null`.
pub const MAX_EXPANSIONS: u8 = 2;

/// Example keys shown for map fields.
pub const MAP_EXAMPLE_KEYS: [&str; 2] = ["key1", "key2"];

/// Example payload generator over a read-only package.
#[derive(Debug, Clone, Copy)]
pub struct ExampleSynthesizer<'a> {
    package: &'a Package,
}

impl<'a> ExampleSynthesizer<'a> {
    /// Creates a synthesizer for `package`.
    pub fn new(package: &'a Package) -> Self {
        Self { package }
    }

    /// Example value of the message `name`.
    ///
    /// `null` when the message is unknown or has no fields.
    pub fn example(&self, name: &str) -> Value {
        match self.package.message(name) {
            Some(message) if !message.fields.is_empty() => Expansion {
                package: self.package,
                visits: HashMap::new(),
            }
            .message(message),
            _ => Value::Null,
        }
    }

    /// Example of the message `name` as indented JSON text.
    pub fn example_json(&self, name: &str) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.example(name))?)
    }
}

struct Expansion<'a> {
    package: &'a Package,
    visits: HashMap<String, u8>,
}

impl<'a> Expansion<'a> {
    fn message(&mut self, message: &Message) -> Value {
        let object: Map<String, Value> = message
            .fields
            .iter()
            .map(|f| (f.json_name().to_string(), self.field(f)))
            .collect();
        Value::Object(object)
    }

    /// Repeated fields wrap exactly one element.
    fn field(&mut self, field: &MessageField) -> Value {
        match self.element(field) {
            Some(value) if field.is_repeated() => Value::Array(vec![value]),
            Some(value) => value,
            None => Value::Null,
        }
    }

    /// `None` once the field position is exhausted.
    fn element(&mut self, field: &MessageField) -> Option<Value> {
        if field.json_type() != JsonType::Object {
            return Some(field.default_value());
        }

        if field.is_enum() {
            let name = self
                .package
                .enumeration(&field.proto_type_name)
                .and_then(|e| e.default_value())
                .map(|v| v.name.clone())
                .unwrap_or_default();
            return Some(Value::String(name));
        }

        let key = format!("{}.{}", field.message_name, field.proto_name);
        let visits = self.visits.entry(key).or_default();
        if *visits >= MAX_EXPANSIONS {
            return None;
        }
        *visits += 1;

        let package = self.package;
        let Some(nested) = package.message(&field.proto_type_name) else {
            return Some(Value::Null);
        };

        if field.is_entry() {
            if let Some(value_field) = nested.field("value") {
                let value = self.element(value_field).unwrap_or(Value::Null);
                let object = MAP_EXAMPLE_KEYS
                    .iter()
                    .map(|k| (k.to_string(), value.clone()))
                    .collect();
                return Some(Value::Object(object));
            }
        }

        Some(self.message(nested))
    }
}
