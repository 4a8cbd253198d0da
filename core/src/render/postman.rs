//! # Postman Collection
//!
//! One folder per service, one request per method (collection format v2.1).

use super::{DocumentRenderer, RenderContext};
use crate::config::{Config, DocumentType};
use crate::error::AppResult;
use crate::model::HttpMethod;
use crate::schema::{Operation, Placement};
use serde::Serialize;
use url::Url;

/// Schema URL of the collection format.
pub const COLLECTION_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Renders `postman.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostmanRenderer;

impl DocumentRenderer for PostmanRenderer {
    fn document_type(&self) -> DocumentType {
        DocumentType::Postman
    }

    fn render(&self, ctx: &RenderContext<'_>) -> AppResult<String> {
        let base = BaseUrl::from_config(ctx.config);

        let mut item = Vec::with_capacity(ctx.package.services.len());
        for service in &ctx.package.services {
            let requests = ctx
                .operations_of(service)
                .map(|op| request_item(ctx, &base, op))
                .collect::<AppResult<Vec<_>>>()?;
            item.push(Folder {
                name: &service.name,
                description: &service.description,
                item: requests,
            });
        }

        let collection = Collection {
            info: Info {
                name: ctx.title(),
                schema: COLLECTION_SCHEMA,
            },
            item,
        };
        Ok(serde_json::to_string_pretty(&collection)?)
    }
}

/// The configured address broken down into its URL parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BaseUrl {
    raw: String,
    protocol: String,
    host: Vec<String>,
    port: String,
}

impl BaseUrl {
    fn from_config(config: &Config) -> Self {
        let raw = config.address();
        let parsed = Url::parse(&raw).ok();

        let protocol = parsed
            .as_ref()
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|| "http".to_string());
        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| config.host.clone());

        Self {
            raw,
            protocol,
            host: host.split('.').map(str::to_string).collect(),
            port: config.port.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Collection<'a> {
    info: Info<'a>,
    item: Vec<Folder<'a>>,
}

#[derive(Debug, Serialize)]
struct Info<'a> {
    name: &'a str,
    schema: &'static str,
}

#[derive(Debug, Serialize)]
struct Folder<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    item: Vec<Item<'a>>,
}

#[derive(Debug, Serialize)]
struct Item<'a> {
    name: &'a str,
    request: Request<'a>,
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    method: HttpMethod,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    header: Vec<Header<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Body<'a>>,
    url: RequestUrl<'a>,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct Header<'a> {
    key: &'a str,
    value: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct Body<'a> {
    mode: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<BodyOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    formdata: Vec<FormData<'a>>,
}

#[derive(Debug, Serialize)]
struct BodyOptions {
    raw: RawOptions,
}

#[derive(Debug, Serialize)]
struct RawOptions {
    language: &'static str,
}

#[derive(Debug, Serialize)]
struct FormData<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct RequestUrl<'a> {
    raw: String,
    protocol: &'a str,
    host: &'a [String],
    #[serde(skip_serializing_if = "str::is_empty")]
    port: &'a str,
    path: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    query: Vec<Query<'a>>,
}

#[derive(Debug, Serialize)]
struct Query<'a> {
    key: &'a str,
    value: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

fn request_item<'a>(
    ctx: &'a RenderContext<'a>,
    base: &'a BaseUrl,
    op: &'a Operation,
) -> AppResult<Item<'a>> {
    let mut url = RequestUrl {
        raw: format!("{}{}", base.raw, op.path),
        protocol: &base.protocol,
        host: &base.host,
        port: &base.port,
        path: op.path.trim_start_matches('/').split('/').collect(),
        query: Vec::new(),
    };

    let header = ctx
        .config
        .header
        .iter()
        .map(|key| Header {
            key,
            value: "",
            kind: "default",
        })
        .collect();

    let mut body = None;
    let request = ctx
        .package
        .message(&op.request_name)
        .filter(|m| !m.fields.is_empty());

    if let Some(message) = request {
        if op.method == HttpMethod::Get {
            url.query = message
                .fields
                .iter()
                .map(|f| Query {
                    key: f.json_name(),
                    value: "",
                    description: &f.description,
                })
                .collect();
        } else if op.consume.as_ref().is_some_and(|c| c.is_form_data()) {
            body = Some(Body {
                mode: "formdata",
                raw: String::new(),
                options: None,
                formdata: op
                    .parameters_in(Placement::FormData)
                    .map(|p| FormData {
                        key: &p.name,
                        kind: if p.is_file() { "file" } else { "text" },
                        description: &p.description,
                    })
                    .collect(),
            });
        } else if op.consume.as_ref().is_some_and(|c| c.is_json()) {
            body = Some(Body {
                mode: "raw",
                raw: ctx.examples.example_json(&op.request_name)?,
                options: Some(BodyOptions {
                    raw: RawOptions { language: "json" },
                }),
                formdata: Vec::new(),
            });
        }
    }

    Ok(Item {
        name: &op.path,
        request: Request {
            method: op.method,
            header,
            body,
            url,
            description: &op.summary,
        },
    })
}
