//! # Routes
//!
//! Per-method parameter placement and response schema.
//!
//! Parameters are emitted in a fixed order:
//! 1. one header parameter per configured header,
//! 2. one path parameter per `{name}` segment of the path template,
//! 3. the request message, placed by content type and verb:
//!    form fields for `multipart/form-data`, query fields for `GET`, a single
//!    body parameter otherwise.

use super::{Definition, Definitions, SchemaType};
use crate::error::{AppError, AppResult};
use crate::model::{ContentType, HttpMethod, Package, ServiceMethod};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// HTTP header.
    Header,
    /// Path template segment.
    Path,
    /// Query string.
    Query,
    /// Whole request body.
    Body,
    /// One part of a multipart form.
    FormData,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Placement.
    #[serde(rename = "in")]
    pub placement: Placement,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Always `false`: nothing in the declarations marks a parameter mandatory.
    pub required: bool,
    /// Type of a non-body parameter.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Format of a scalar parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Element schema of an array parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Definition>>,
    /// Allowed values of an enum parameter.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Default value of an enum parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Schema of a body parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Definition>,
}

impl Parameter {
    /// An optional parameter of the given type.
    pub fn new(name: impl Into<String>, placement: Placement, schema_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            placement,
            description: String::new(),
            required: false,
            schema_type: Some(schema_type),
            format: None,
            items: None,
            enum_values: None,
            default: None,
            schema: None,
        }
    }

    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this parameter uploads a file.
    pub fn is_file(&self) -> bool {
        self.schema_type == Some(SchemaType::File)
    }
}

/// A resolved service method.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Owning service name.
    pub service: String,
    /// Method name.
    pub name: String,
    /// Method description.
    pub summary: String,
    /// URL path template.
    pub path: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Request media type.
    pub consume: Option<ContentType>,
    /// Response media type.
    pub produce: ContentType,
    /// Request message name.
    pub request_name: String,
    /// Response message name.
    pub response_name: String,
    /// Ordered parameters.
    pub parameters: Vec<Parameter>,
    /// Schema of the single success response.
    pub response: Definition,
}

impl Operation {
    /// Parameters carried in `placement`.
    pub fn parameters_in(&self, placement: Placement) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.placement == placement)
    }
}

/// Resolves every method of every service, in service order.
///
/// Fails on the first path + verb pair already registered by an earlier method.
pub fn resolve_operations(
    package: &Package,
    definitions: &Definitions,
    headers: &[String],
) -> AppResult<Vec<Operation>> {
    let mut seen = HashSet::new();
    let mut operations = Vec::new();

    for service in &package.services {
        for method in &service.methods {
            if !seen.insert((method.path.clone(), method.method)) {
                return Err(AppError::DuplicateRoute {
                    path: method.path.clone(),
                    method: method.method,
                });
            }

            operations.push(Operation {
                service: service.name.clone(),
                name: method.name.clone(),
                summary: method.description.clone(),
                path: method.path.clone(),
                method: method.method,
                consume: method.consume.clone(),
                produce: method.produce.clone(),
                request_name: method.request_name.clone(),
                response_name: method.response_name.clone(),
                parameters: parameters(method, definitions, headers),
                response: Definition::reference(&method.response_name),
            });
        }
    }

    Ok(operations)
}

/// Names of the `{name}` segments of a path template, in order.
///
/// A segment may bind a sub-pattern, `{name=shelves/*}`; only the variable
/// name before `=` is returned.
pub fn path_parameters(path: &str) -> Vec<String> {
    static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();
    let re = PATH_PARAM_RE
        .get_or_init(|| Regex::new(r"\{([^{}=]+)(?:=[^{}]*)?\}").expect("Invalid regex"));

    re.captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn parameters(method: &ServiceMethod, definitions: &Definitions, headers: &[String]) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = headers
        .iter()
        .map(|h| {
            Parameter::new(h.as_str(), Placement::Header, SchemaType::String)
                .with_description(format!("{} In Header", h))
        })
        .collect();

    let bound = path_parameters(&method.path);
    params.extend(
        bound
            .iter()
            .map(|name| Parameter::new(name.as_str(), Placement::Path, SchemaType::String)),
    );

    if method.consumes_form_data() {
        params.extend(flat_parameters(method, definitions, &bound, Placement::FormData));
    } else if method.method == HttpMethod::Get {
        params.extend(flat_parameters(method, definitions, &bound, Placement::Query));
    } else {
        params.push(Parameter {
            schema_type: None,
            schema: Some(Definition::reference(&method.request_name)),
            ..Parameter::new(method.name.as_str(), Placement::Body, SchemaType::Object)
                .with_description(method.description.as_str())
        });
    }

    params
}

/// One parameter per request field that has a flat representation.
fn flat_parameters(
    method: &ServiceMethod,
    definitions: &Definitions,
    bound: &[String],
    placement: Placement,
) -> Vec<Parameter> {
    let Some(properties) = definitions
        .get(&method.request_name)
        .and_then(|d| d.properties.as_ref())
    else {
        return Vec::new();
    };

    properties
        .iter()
        .filter(|(name, _)| !bound.iter().any(|b| b == *name))
        .filter_map(|(name, property)| {
            let param = match placement {
                Placement::FormData => form_parameter(name, property, definitions),
                _ => query_parameter(name, property, definitions),
            };
            if param.is_none() {
                debug!(method = %method.name, field = %name, placement = ?placement, "field has no flat representation");
            }
            param
        })
        .collect()
}

fn enum_definition<'d>(property: &Definition, definitions: &'d Definitions) -> Option<&'d Definition> {
    property
        .reference_name()
        .and_then(|name| definitions.get(name))
        .filter(|d| d.is_enum())
}

fn enum_parameter(name: &str, placement: Placement, def: &Definition, description: &str) -> Parameter {
    Parameter {
        enum_values: def.enum_values.clone(),
        default: def.default.clone(),
        ..Parameter::new(name, placement, SchemaType::String).with_description(description)
    }
}

fn scalar_type(property: &Definition) -> Option<SchemaType> {
    property.schema_type.filter(|t| {
        matches!(
            t,
            SchemaType::String | SchemaType::Number | SchemaType::Integer | SchemaType::Boolean
        )
    })
}

fn scalar_parameter(name: &str, placement: Placement, property: &Definition) -> Option<Parameter> {
    Some(Parameter {
        format: property.format.clone(),
        ..Parameter::new(name, placement, scalar_type(property)?)
            .with_description(property.description.as_str())
    })
}

/// Enums expand to their values; repeated enums and repeated scalars become
/// arrays; messages and maps are omitted.
fn query_parameter(name: &str, property: &Definition, definitions: &Definitions) -> Option<Parameter> {
    if property.is_array() {
        let items = property.items.as_deref()?;
        let element = if let Some(def) = enum_definition(items, definitions) {
            Definition {
                schema_type: def.schema_type,
                enum_values: def.enum_values.clone(),
                default: def.default.clone(),
                ..Default::default()
            }
        } else {
            Definition::primitive(scalar_type(items)?, items.format.as_deref())
        };
        return Some(Parameter {
            items: Some(Box::new(element)),
            ..Parameter::new(name, Placement::Query, SchemaType::Array)
                .with_description(property.description.as_str())
        });
    }

    if property.reference.is_some() {
        let def = enum_definition(property, definitions)?;
        return Some(enum_parameter(name, Placement::Query, def, &def.description));
    }

    scalar_parameter(name, Placement::Query, property)
}

/// Arrays are omitted; bytes become file uploads; enums expand to their values.
fn form_parameter(name: &str, property: &Definition, definitions: &Definitions) -> Option<Parameter> {
    if property.is_array() {
        return None;
    }

    if property.reference.is_some() {
        let def = enum_definition(property, definitions)?;
        return Some(enum_parameter(name, Placement::FormData, def, &def.description));
    }

    if property.format.as_deref() == Some("bytes") {
        return Some(
            Parameter::new(name, Placement::FormData, SchemaType::File)
                .with_description(property.description.as_str()),
        );
    }

    scalar_parameter(name, Placement::FormData, property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::field_descriptor_proto::{Label, Type};
    use crate::model::{Enum, EnumField, Message, MessageField, Service};
    use crate::schema::resolve_definitions;
    use pretty_assertions::assert_eq;

    fn field(owner: &str, name: &str, ty: Type, label: Label, type_name: &str) -> MessageField {
        MessageField {
            message_name: owner.into(),
            description: name.into(),
            proto_name: name.into(),
            proto_type: ty,
            proto_label: label,
            proto_type_name: type_name.into(),
            proto_full_name: String::new(),
            proto_package_path: String::new(),
            proto_number: 1,
        }
    }

    fn method(name: &str, verb: HttpMethod, path: &str, request: &str) -> ServiceMethod {
        let mut m = ServiceMethod::new(name, name);
        m.method = verb;
        m.path = path.into();
        m.request_name = request.into();
        m.response_name = "Reply".into();
        if verb != HttpMethod::Get {
            m.consume = Some(ContentType::json());
        }
        m
    }

    fn package(methods: Vec<ServiceMethod>) -> Package {
        let mut p = Package::new("pkg", "1");

        let mut kind = Enum::new("Kind", "Kind of person");
        kind.fields.push(EnumField {
            name: "HUMAN".into(),
            value: 0,
            description: "HUMAN".into(),
        });
        p.append_enum(kind);

        let mut person = Message::new("Person", "Person");
        person.fields = vec![
            field("Person", "name", Type::String, Label::Optional, "TYPE_STRING"),
            field("Person", "age", Type::Int32, Label::Optional, "TYPE_INT32"),
        ];
        p.append_message(person);

        let mut upload = Message::new("Upload", "Upload");
        upload.fields = vec![
            field("Upload", "id", Type::String, Label::Optional, "TYPE_STRING"),
            field("Upload", "data", Type::Bytes, Label::Optional, "TYPE_BYTES"),
            field("Upload", "kind", Type::Enum, Label::Optional, "Kind"),
            field("Upload", "tags", Type::String, Label::Repeated, "TYPE_STRING"),
            field("Upload", "kinds", Type::Enum, Label::Repeated, "Kind"),
            field("Upload", "owner", Type::Message, Label::Optional, "Person"),
        ];
        p.append_message(upload);
        p.append_message(Message::new("Reply", "Reply"));

        let mut svc = Service::new("Svc", "Svc");
        svc.methods = methods;
        p.append_service(svc);
        p.sort();
        p
    }

    fn resolve(p: &Package) -> AppResult<Vec<Operation>> {
        resolve_operations(p, &resolve_definitions(p), &[])
    }

    fn names(op: &Operation, placement: Placement) -> Vec<&str> {
        op.parameters_in(placement).map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_get_places_fields_in_query() {
        let p = package(vec![method("List", HttpMethod::Get, "/people", "Person")]);
        let ops = resolve(&p).unwrap();
        let op = &ops[0];
        assert_eq!(names(op, Placement::Query), vec!["name", "age"]);
        assert!(op.parameters.iter().all(|p| !p.required));
        assert_eq!(names(op, Placement::Body), Vec::<&str>::new());
        assert_eq!(op.response.reference_name(), Some("Reply"));
    }

    #[test]
    fn test_post_json_places_single_body() {
        let p = package(vec![method("Create", HttpMethod::Post, "/people", "Person")]);
        let ops = resolve(&p).unwrap();
        let body: Vec<_> = ops[0].parameters_in(Placement::Body).collect();
        assert_eq!(body.len(), 1);
        assert_eq!(
            body[0].schema.as_ref().and_then(|s| s.reference_name()),
            Some("Person")
        );
        assert_eq!(ops[0].parameters.len(), 1);
    }

    #[test]
    fn test_headers_then_path_parameters() {
        let p = package(vec![method("Get", HttpMethod::Get, "/people/{name}/{id}", "Person")]);
        let defs = resolve_definitions(&p);
        let ops = resolve_operations(&p, &defs, &["Authorization".to_string()]).unwrap();
        let placed: Vec<_> = ops[0]
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.placement))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("Authorization", Placement::Header),
                ("name", Placement::Path),
                ("id", Placement::Path),
                ("age", Placement::Query),
            ]
        );
        assert_eq!(ops[0].parameters[0].description, "Authorization In Header");
    }

    #[test]
    fn test_query_expands_enums_and_scalar_arrays() {
        let p = package(vec![method("Find", HttpMethod::Get, "/uploads", "Upload")]);
        let ops = resolve(&p).unwrap();
        let op = &ops[0];
        assert_eq!(names(op, Placement::Query), vec!["id", "data", "kind", "tags", "kinds"]);

        let kind = op.parameters.iter().find(|p| p.name == "kind").unwrap();
        assert_eq!(kind.enum_values, Some(vec!["HUMAN".to_string()]));
        assert_eq!(kind.default, Some(Value::from("HUMAN")));

        let kinds = op.parameters.iter().find(|p| p.name == "kinds").unwrap();
        assert_eq!(kinds.schema_type, Some(SchemaType::Array));
        assert_eq!(
            kinds.items.as_ref().and_then(|i| i.enum_values.clone()),
            Some(vec!["HUMAN".to_string()])
        );

        let tags = op.parameters.iter().find(|p| p.name == "tags").unwrap();
        assert_eq!(
            tags.items.as_ref().and_then(|i| i.schema_type),
            Some(SchemaType::String)
        );
    }

    #[test]
    fn test_form_data_fields() {
        let mut m = method("Upload", HttpMethod::Post, "/uploads", "Upload");
        m.consume = Some(ContentType::new(ContentType::FORM_DATA));
        let p = package(vec![m]);
        let ops = resolve(&p).unwrap();
        let op = &ops[0];
        assert_eq!(names(op, Placement::FormData), vec!["id", "data", "kind"]);
        let data = op.parameters.iter().find(|p| p.name == "data").unwrap();
        assert!(data.is_file());
    }

    #[test]
    fn test_duplicate_route_is_fatal() {
        let mut p = package(vec![method("A", HttpMethod::Post, "/x", "Person")]);
        let mut other = Service::new("Other", "Other");
        other.methods.push(method("B", HttpMethod::Post, "/x", "Person"));
        p.append_service(other);
        p.sort();

        let err = resolve(&p).unwrap_err();
        assert_eq!(format!("{}", err), "duplicate route. /x [POST]");
    }

    #[test]
    fn test_same_path_different_verb_is_allowed() {
        let p = package(vec![
            method("Get", HttpMethod::Get, "/x", "Person"),
            method("Put", HttpMethod::Put, "/x", "Person"),
        ]);
        assert_eq!(resolve(&p).unwrap().len(), 2);
    }

    #[test]
    fn test_path_parameters_scan() {
        assert_eq!(path_parameters("/a/{id}/b/{name}"), vec!["id", "name"]);
        assert_eq!(path_parameters("/a/{}/b"), Vec::<String>::new());
        assert_eq!(path_parameters("/plain"), Vec::<String>::new());
    }

    #[test]
    fn test_path_parameters_with_sub_pattern() {
        assert_eq!(
            path_parameters("/v1/{name=shelves/*}/books/{book}"),
            vec!["name", "book"]
        );
        assert_eq!(path_parameters("/v1/{path=**}"), vec!["path"]);

        let p = package(vec![method("Get", HttpMethod::Get, "/v1/{name=people/*}", "Person")]);
        let ops = resolve(&p).unwrap();
        assert_eq!(names(&ops[0], Placement::Path), vec!["name"]);
        assert_eq!(names(&ops[0], Placement::Query), vec!["age"]);
    }
}
