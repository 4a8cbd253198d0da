//! # Swagger 2.0
//!
//! Serializes the resolved definitions and operations as a Swagger 2.0 document.

use super::{DocumentRenderer, RenderContext};
use crate::config::DocumentType;
use crate::error::AppResult;
use crate::schema::{Definition, Definitions, Parameter};
use indexmap::IndexMap;
use serde::Serialize;

/// Swagger specification version written to every document.
pub const SWAGGER_VERSION: &str = "2.0";

/// Renders `swagger.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaggerRenderer;

impl DocumentRenderer for SwaggerRenderer {
    fn document_type(&self) -> DocumentType {
        DocumentType::Swagger
    }

    fn render(&self, ctx: &RenderContext<'_>) -> AppResult<String> {
        let document = SwaggerDocument::from_context(ctx);
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwaggerDocument<'a> {
    swagger: &'static str,
    info: Info<'a>,
    #[serde(skip_serializing_if = "String::is_empty")]
    host: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    schemes: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag<'a>>,
    paths: IndexMap<&'a str, IndexMap<&'static str, PathOperation<'a>>>,
    definitions: &'a Definitions,
}

#[derive(Debug, Serialize)]
struct Info<'a> {
    title: &'a str,
    version: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct Tag<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct PathOperation<'a> {
    tags: [&'a str; 1],
    summary: &'a str,
    #[serde(rename = "operationId")]
    operation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    consumes: Vec<&'a str>,
    produces: Vec<&'a str>,
    parameters: &'a [Parameter],
    responses: IndexMap<&'static str, Response<'a>>,
}

#[derive(Debug, Serialize)]
struct Response<'a> {
    description: &'static str,
    schema: &'a Definition,
}

impl<'a> SwaggerDocument<'a> {
    fn from_context(ctx: &'a RenderContext<'a>) -> Self {
        let title = ctx.title();

        let tags = ctx
            .package
            .services
            .iter()
            .map(|s| Tag {
                name: &s.name,
                description: &s.description,
            })
            .collect();

        let mut paths: IndexMap<&str, IndexMap<&'static str, PathOperation>> = IndexMap::new();
        for op in &ctx.operations {
            let operation = PathOperation {
                tags: [op.service.as_str()],
                summary: &op.summary,
                operation_id: format!("{}_{}", op.service, op.name),
                consumes: op.consume.iter().map(|c| c.as_str()).collect(),
                produces: vec![op.produce.as_str()],
                parameters: &op.parameters,
                responses: IndexMap::from([(
                    "200",
                    Response {
                        description: "successful",
                        schema: &op.response,
                    },
                )]),
            };
            paths
                .entry(op.path.as_str())
                .or_default()
                .insert(op.method.lower_case(), operation);
        }

        Self {
            swagger: SWAGGER_VERSION,
            info: Info {
                title,
                version: &ctx.package.version,
                description: title,
            },
            host: ctx.config.host_with_port(),
            schemes: ctx.config.scheme.iter().map(String::as_str).collect(),
            tags,
            paths,
            definitions: &ctx.definitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::descriptor::field_descriptor_proto::{Label, Type};
    use crate::model::{HttpMethod, Message, MessageField, Package, Service, ServiceMethod};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn package() -> Package {
        let mut p = Package::new("acme", "20240101000000");
        let mut req = Message::new("GetReq", "GetReq");
        req.fields.push(MessageField {
            message_name: "GetReq".into(),
            description: "Record id".into(),
            proto_name: "id".into(),
            proto_type: Type::Int64,
            proto_label: Label::Optional,
            proto_type_name: "TYPE_INT64".into(),
            proto_full_name: String::new(),
            proto_package_path: String::new(),
            proto_number: 1,
        });
        p.append_message(req);
        p.append_message(Message::new("Reply", "Reply"));

        let mut get = ServiceMethod::new("Get", "Fetch a record");
        get.method = HttpMethod::Get;
        get.path = "/records/{id}".into();
        get.request_name = "GetReq".into();
        get.response_name = "Reply".into();

        let mut svc = Service::new("Records", "Record store");
        svc.methods.push(get);
        p.append_service(svc);
        p
    }

    #[test]
    fn test_swagger_document() {
        let p = package();
        let mut config = Config::default();
        config.apply("port", "8080").unwrap();
        config.apply("scheme", "https").unwrap();
        let config = config.finish();

        let ctx = RenderContext::new(&p, &config).unwrap();
        let text = SwaggerRenderer.render(&ctx).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(doc["swagger"], json!("2.0"));
        assert_eq!(
            doc["info"],
            json!({"title": "acme", "version": "20240101000000", "description": "acme"})
        );
        assert_eq!(doc["host"], json!("127.0.0.1:8080"));
        assert_eq!(doc["schemes"], json!(["https"]));
        assert_eq!(doc["tags"], json!([{"name": "Records", "description": "Record store"}]));
        assert_eq!(
            doc["paths"]["/records/{id}"]["get"],
            json!({
                "tags": ["Records"],
                "summary": "Fetch a record",
                "operationId": "Records_Get",
                "produces": ["application/json"],
                "parameters": [
                    {"name": "id", "in": "path", "required": false, "type": "string"}
                ],
                "responses": {
                    "200": {
                        "description": "successful",
                        "schema": {"$ref": "#/definitions/Reply"}
                    }
                }
            })
        );
        assert_eq!(
            doc["definitions"]["GetReq"]["properties"]["id"],
            json!({"type": "integer", "format": "int64", "description": "Record id"})
        );
    }
}
