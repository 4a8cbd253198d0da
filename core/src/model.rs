#![deny(missing_docs)]

//! # Declaration Model
//!
//! The normalized, cross-referenced representation of the declaration tree.
//!
//! A [`Package`] owns every service, message and enum. Methods and fields refer to
//! messages and enums by *name*; the name is resolved through the package
//! dictionaries at read time, which permits forward references and keeps the
//! ownership graph acyclic.

use crate::descriptor::field_descriptor_proto::{Label as FieldLabel, Type as FieldType};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP verb of a service method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    #[default]
    Post,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb, e.g. `GET`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lower-case verb, as used for Swagger path item keys.
    pub fn lower_case(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request or response media type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// `application/json`
    pub const JSON: &'static str = "application/json";
    /// `multipart/form-data`
    pub const FORM_DATA: &'static str = "multipart/form-data";

    /// Creates a content type from a raw media type string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The JSON media type.
    pub fn json() -> Self {
        Self::new(Self::JSON)
    }

    /// Returns the raw media type.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is `application/json`.
    pub fn is_json(&self) -> bool {
        self.0 == Self::JSON
    }

    /// Whether this is `multipart/form-data`.
    pub fn is_form_data(&self) -> bool {
        self.0 == Self::FORM_DATA
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Documentation-facing type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    /// Message or enum.
    Object,
    /// Any numeric scalar.
    Number,
    /// `string` or `bytes`.
    String,
    /// `bool`
    Boolean,
}

impl JsonType {
    /// Example literal for a scalar of this type; `null` for objects.
    pub fn default_value(&self) -> Value {
        match self {
            JsonType::Number => Value::from(0),
            JsonType::String => Value::from("string"),
            JsonType::Boolean => Value::from(false),
            JsonType::Object => Value::Null,
        }
    }

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Object => "Object",
            JsonType::Number => "Number",
            JsonType::String => "String",
            JsonType::Boolean => "Boolean",
        }
    }
}

impl From<FieldType> for JsonType {
    fn from(pt: FieldType) -> Self {
        match pt {
            FieldType::Double
            | FieldType::Float
            | FieldType::Int64
            | FieldType::Uint64
            | FieldType::Int32
            | FieldType::Fixed64
            | FieldType::Fixed32
            | FieldType::Uint32
            | FieldType::Sfixed32
            | FieldType::Sfixed64
            | FieldType::Sint32
            | FieldType::Sint64 => JsonType::Number,
            FieldType::Group | FieldType::Message | FieldType::Enum => JsonType::Object,
            FieldType::String | FieldType::Bytes => JsonType::String,
            FieldType::Bool => JsonType::Boolean,
        }
    }
}

/// Documentation-facing cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonLabel {
    /// May be omitted.
    Optional,
    /// Must be present.
    Required,
    /// Zero or more values.
    Repeated,
}

impl JsonLabel {
    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonLabel::Optional => "optional",
            JsonLabel::Required => "required",
            JsonLabel::Repeated => "repeated",
        }
    }
}

impl From<FieldLabel> for JsonLabel {
    fn from(pl: FieldLabel) -> Self {
        match pl {
            FieldLabel::Optional => JsonLabel::Optional,
            FieldLabel::Required => JsonLabel::Required,
            FieldLabel::Repeated => JsonLabel::Repeated,
        }
    }
}

impl fmt::Display for JsonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Root aggregate of a generation run.
///
/// Populated by the model builder, then sorted and treated as read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    /// Package name.
    pub name: String,
    /// Document version.
    pub version: String,
    /// Services.
    pub services: Vec<Service>,
    /// Messages keyed by (synthesized) name.
    pub messages: IndexMap<String, Message>,
    /// Enums keyed by (synthesized) name.
    pub enums: IndexMap<String, Enum>,
}

impl Package {
    /// Creates an empty package.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Registers an enum. The first registration of a name wins; returns
    /// `false` when the enum was dropped as a duplicate.
    pub fn append_enum(&mut self, def: Enum) -> bool {
        if self.enums.contains_key(&def.name) {
            return false;
        }
        self.enums.insert(def.name.clone(), def);
        true
    }

    /// Registers a message. The first registration of a name wins; returns
    /// `false` when the message was dropped as a duplicate.
    pub fn append_message(&mut self, def: Message) -> bool {
        if self.messages.contains_key(&def.name) {
            return false;
        }
        self.messages.insert(def.name.clone(), def);
        true
    }

    /// Registers a service.
    pub fn append_service(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Orders services, messages and enums by name (byte-wise ascending).
    pub fn sort(&mut self) {
        self.services.sort_by(|l, r| l.name.cmp(&r.name));
        self.messages.sort_keys();
        self.enums.sort_keys();
    }

    /// Looks up a message by name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.get(name)
    }

    /// Looks up an enum by name.
    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }
}

/// A service and its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Comment, or the name when uncommented.
    pub description: String,
    /// Methods in declaration order.
    pub methods: Vec<ServiceMethod>,
}

impl Service {
    /// Creates a service with no methods.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            methods: Vec::new(),
        }
    }
}

/// A service method (rpc).
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMethod {
    /// Method name.
    pub name: String,
    /// URL path template, e.g. `/users/{id}`.
    pub path: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Comment, or the name when uncommented.
    pub description: String,
    /// Request media type; `None` for GET without an explicit annotation.
    pub consume: Option<ContentType>,
    /// Response media type.
    pub produce: ContentType,
    /// Request message name.
    pub request_name: String,
    /// Response message name.
    pub response_name: String,
}

impl ServiceMethod {
    /// Creates a POST method with JSON media types and no path.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            method: HttpMethod::default(),
            description: description.into(),
            consume: None,
            produce: ContentType::json(),
            request_name: String::new(),
            response_name: String::new(),
        }
    }

    /// Whether the request is sent as `multipart/form-data`.
    pub fn consumes_form_data(&self) -> bool {
        self.consume.as_ref().is_some_and(ContentType::is_form_data)
    }
}

/// A message type.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Message name; nested messages use `Outer_Inner`.
    pub name: String,
    /// Comment, or the name when uncommented.
    pub description: String,
    /// Fields in declaration order.
    pub fields: Vec<MessageField>,
}

impl Message {
    /// Creates a message with no fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Looks up a field by its proto name.
    pub fn field(&self, name: &str) -> Option<&MessageField> {
        self.fields.iter().find(|f| f.proto_name == name)
    }
}

/// A message field.
///
/// Only the structural (proto) values are stored; the documentation-facing
/// values are computed from them.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageField {
    /// Name of the owning message.
    pub message_name: String,
    /// Comment, or the field name when uncommented.
    pub description: String,
    /// Field name as declared.
    pub proto_name: String,
    /// Field type.
    pub proto_type: FieldType,
    /// Field label.
    pub proto_label: FieldLabel,
    /// Referenced type name for message/enum fields, scalar type name otherwise.
    pub proto_type_name: String,
    /// Fully-qualified referenced type, e.g. `.user.User`; empty for scalars.
    pub proto_full_name: String,
    /// Package of the referenced type; empty for scalars.
    pub proto_package_path: String,
    /// Field number.
    pub proto_number: i32,
}

impl MessageField {
    /// Name used in JSON payloads.
    pub fn json_name(&self) -> &str {
        &self.proto_name
    }

    /// Documentation type.
    pub fn json_type(&self) -> JsonType {
        JsonType::from(self.proto_type)
    }

    /// Documentation cardinality.
    pub fn json_label(&self) -> JsonLabel {
        JsonLabel::from(self.proto_label)
    }

    /// Example literal for scalar fields; `null` for objects.
    pub fn default_value(&self) -> Value {
        self.json_type().default_value()
    }

    /// Whether the field is repeated.
    pub fn is_repeated(&self) -> bool {
        self.proto_label == FieldLabel::Repeated
    }

    /// Whether the field references a message (or group).
    pub fn is_message(&self) -> bool {
        matches!(self.proto_type, FieldType::Message | FieldType::Group)
    }

    /// Whether the field references an enum.
    pub fn is_enum(&self) -> bool {
        self.proto_type == FieldType::Enum
    }

    /// Whether the referenced message is the entry type `protoc` synthesizes
    /// for a `map<K, V>` field, e.g. `User_LabelsEntry` for `User.labels`.
    pub fn is_entry(&self) -> bool {
        self.proto_type == FieldType::Message
            && self.proto_type_name == entry_name(&self.message_name, &self.proto_name)
    }

    /// Type shown in documentation tables: the referenced type name for
    /// objects, the JSON type otherwise.
    pub fn display_type(&self) -> &str {
        match self.json_type() {
            JsonType::Object => &self.proto_type_name,
            other => other.as_str(),
        }
    }
}

/// Name of the map entry type synthesized for `field` of `message`.
///
/// Follows `protoc`: each `_`-separated part of the field name has its first
/// ASCII lowercase letter raised, the rest is kept as written, so `HTTPHeaders`
/// gives `HTTPHeadersEntry` and `aB_c` gives `ABCEntry`.
pub fn entry_name(message: &str, field: &str) -> String {
    let mut name = format!("{}_", message);
    for part in field.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name.push_str("Entry");
    name
}

/// An enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    /// Enum name; nested enums use `Outer_Inner`.
    pub name: String,
    /// Comment, or the name when uncommented.
    pub description: String,
    /// Values in declaration order; the first is the default.
    pub fields: Vec<EnumField>,
}

impl Enum {
    /// Creates an enum with no values.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// The default (first declared) value.
    pub fn default_value(&self) -> Option<&EnumField> {
        self.fields.first()
    }
}

/// An enum value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumField {
    /// Value name.
    pub name: String,
    /// Value number.
    pub value: i32,
    /// Comment, or the name when uncommented.
    pub description: String,
}
