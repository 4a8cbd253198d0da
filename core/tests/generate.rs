//! End-to-end generation from a plugin request.

use apidoc_core::descriptor::field_descriptor_proto::{Label, Type};
use apidoc_core::descriptor::http_rule::Pattern;
use apidoc_core::descriptor::source_code_info::Location;
use apidoc_core::descriptor::{
    CodeGeneratorRequest, CodeGeneratorResponse, DescriptorProto, EnumDescriptorProto,
    EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto, HttpRule,
    MethodDescriptorProto, MethodOptions, ServiceDescriptorProto, SourceCodeInfo,
};
use apidoc_core::{build_package, process, run, AppError, ExampleSynthesizer};
use pretty_assertions::assert_eq;
use prost::Message;
use serde_json::{json, Value};

const ALL_DOCUMENTS: &str =
    "configfile=/dev/null,title=Shop,output=swagger,output=postman,output=html,output=markdown";

fn field(name: &str, number: i32, ty: Type, label: Label, target: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        type_name: target.map(str::to_string),
    }
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, ty, Label::Optional, None)
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: fields,
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str, pattern: Pattern) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.into()),
        input_type: Some(format!(".shop.{}", input)),
        output_type: Some(format!(".shop.{}", output)),
        options: Some(MethodOptions {
            http: Some(HttpRule {
                pattern: Some(pattern),
            }),
            apidoc: None,
        }),
    }
}

fn shop_file(methods: Vec<MethodDescriptorProto>) -> FileDescriptorProto {
    let mut tag = message(
        "Tag",
        vec![field(
            "counts",
            1,
            Type::Message,
            Label::Repeated,
            Some(".shop.Tag.CountsEntry"),
        )],
    );
    tag.nested_type.push(message(
        "CountsEntry",
        vec![scalar("key", 1, Type::String), scalar("value", 2, Type::Int32)],
    ));

    FileDescriptorProto {
        name: Some("shop.proto".into()),
        package: Some("shop".into()),
        enum_type: vec![EnumDescriptorProto {
            name: Some("Color".into()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("RED".into()),
                    number: Some(0),
                },
                EnumValueDescriptorProto {
                    name: Some("BLUE".into()),
                    number: Some(1),
                },
            ],
        }],
        message_type: vec![
            message("Item", vec![scalar("id", 1, Type::Int64)]),
            message(
                "GetItemRequest",
                vec![
                    scalar("id", 1, Type::Int64),
                    field("color", 2, Type::Enum, Label::Optional, Some(".shop.Color")),
                    field("tags", 3, Type::String, Label::Repeated, None),
                ],
            ),
            message(
                "Node",
                vec![
                    scalar("name", 1, Type::String),
                    field("next", 2, Type::Message, Label::Optional, Some(".shop.Node")),
                ],
            ),
            tag,
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("Shop".into()),
            method: methods,
        }],
        source_code_info: Some(SourceCodeInfo {
            location: vec![Location {
                path: vec![6, 0, 2, 0],
                leading_comments: Some(" Fetches one item.\n".into()),
                trailing_comments: None,
            }],
        }),
    }
}

fn shop_methods() -> Vec<MethodDescriptorProto> {
    vec![
        method("GetItem", "GetItemRequest", "Item", Pattern::Get("/items/{id}".into())),
        method("CreateItem", "Item", "Item", Pattern::Post("/items".into())),
        method("Walk", "Node", "Node", Pattern::Post("/nodes".into())),
        method("Count", "Tag", "Tag", Pattern::Put("/tags".into())),
    ]
}

fn request(parameter: &str, methods: Vec<MethodDescriptorProto>) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["shop.proto".into()],
        parameter: Some(parameter.into()),
        proto_file: vec![shop_file(methods)],
    }
}

fn swagger() -> Value {
    let artifacts = run(&request("configfile=/dev/null", shop_methods()), None, "1").unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].file, "swagger.json");
    serde_json::from_str(&artifacts[0].content).unwrap()
}

#[test]
fn test_all_documents_are_produced() {
    let bytes = process(&request(ALL_DOCUMENTS, shop_methods()).encode_to_vec(), "1").unwrap();
    let response = CodeGeneratorResponse::decode(bytes.as_slice()).unwrap();

    let names: Vec<_> = response.file.iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        vec!["shop.swagger.json", "shop.postman.json", "shop.html", "shop.md"]
    );
    assert!(response.file.iter().all(|f| !f.content().is_empty()));
}

#[test]
fn test_generation_is_idempotent() {
    let req = request(ALL_DOCUMENTS, shop_methods());
    assert_eq!(run(&req, None, "7").unwrap(), run(&req, None, "7").unwrap());
}

#[test]
fn test_get_fields_become_query_parameters() {
    let doc = swagger();
    let get = &doc["paths"]["/items/{id}"]["get"];

    assert_eq!(get["summary"], json!("Fetches one item."));
    let placed: Vec<(&str, &str)> = get["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["name"].as_str().unwrap(), p["in"].as_str().unwrap()))
        .collect();
    assert_eq!(placed, vec![("id", "path"), ("color", "query"), ("tags", "query")]);
    assert_eq!(get["parameters"][1]["enum"], json!(["RED", "BLUE"]));
    assert_eq!(get["parameters"][2]["type"], json!("array"));
}

#[test]
fn test_post_body_references_request() {
    let doc = swagger();
    let post = &doc["paths"]["/items"]["post"];

    assert_eq!(post["consumes"], json!(["application/json"]));
    assert_eq!(post["parameters"].as_array().unwrap().len(), 1);
    assert_eq!(post["parameters"][0]["in"], json!("body"));
    assert_eq!(post["parameters"][0]["schema"], json!({"$ref": "#/definitions/Item"}));
    assert_eq!(
        post["responses"]["200"]["schema"],
        json!({"$ref": "#/definitions/Item"})
    );
}

#[test]
fn test_definitions() {
    let doc = swagger();
    let definitions = &doc["definitions"];

    assert_eq!(definitions["Color"]["type"], json!("string"));
    assert_eq!(definitions["Color"]["enum"], json!(["RED", "BLUE"]));
    assert_eq!(
        definitions["Tag"]["properties"]["counts"]["items"]["additionalProperties"],
        json!({"type": "integer", "format": "int32"})
    );
    assert!(definitions.get("Tag_CountsEntry").is_none());
    assert_eq!(
        definitions["Node"]["properties"]["next"],
        json!({"$ref": "#/definitions/Node"})
    );
}

#[test]
fn test_examples() {
    let package = build_package(&request("", shop_methods()), "1").unwrap();
    let examples = ExampleSynthesizer::new(&package);

    assert_eq!(examples.example("Item"), json!({"id": 0}));
    assert_eq!(
        examples.example("Tag"),
        json!({"counts": [{"key1": 0, "key2": 0}]})
    );
    assert_eq!(examples.example("Node")["next"]["next"]["next"], Value::Null);
}

#[test]
fn test_duplicate_route_is_fatal() {
    let mut methods = shop_methods();
    methods.push(method("Again", "Item", "Item", Pattern::Post("/items".into())));

    let err = run(&request("configfile=/dev/null", methods), None, "1").unwrap_err();
    assert!(matches!(err, AppError::DuplicateRoute { .. }));
    assert_eq!(err.to_string(), "duplicate route. /items [POST]");
}

#[test]
fn test_patch_keeps_default_route() {
    let mut methods = shop_methods();
    methods.push(method("Update", "Item", "Item", Pattern::Patch("/v1/items/{id}".into())));
    methods.push(method("Replace", "Item", "Item", Pattern::Post("/v1/items/{id}".into())));

    let artifacts = run(&request("configfile=/dev/null", methods), None, "1").unwrap();
    let doc: Value = serde_json::from_str(&artifacts[0].content).unwrap();

    assert!(doc["paths"]["/Shop/Update"]["post"].is_object());
    assert!(doc["paths"]["/v1/items/{id}"]["post"].is_object());
    assert!(doc["paths"]["/v1/items/{id}"].get("patch").is_none());
}

/// The shop file plus messages holding map fields.
fn map_file() -> FileDescriptorProto {
    let mut headers = message(
        "Headers",
        vec![
            field(
                "HTTPHeaders",
                1,
                Type::Message,
                Label::Repeated,
                Some(".shop.Headers.HTTPHeadersEntry"),
            ),
            field("aB_c", 2, Type::Message, Label::Repeated, Some(".shop.Headers.ABCEntry")),
        ],
    );
    headers.nested_type.push(message(
        "HTTPHeadersEntry",
        vec![scalar("key", 1, Type::String), scalar("value", 2, Type::String)],
    ));
    headers.nested_type.push(message(
        "ABCEntry",
        vec![
            scalar("key", 1, Type::String),
            field("value", 2, Type::Enum, Label::Optional, Some(".shop.Color")),
        ],
    ));

    let mut inner = message(
        "Inner",
        vec![field(
            "items",
            1,
            Type::Message,
            Label::Repeated,
            Some(".shop.Outer.Inner.ItemsEntry"),
        )],
    );
    inner.nested_type.push(message(
        "ItemsEntry",
        vec![
            scalar("key", 1, Type::String),
            field("value", 2, Type::Message, Label::Optional, Some(".shop.Item")),
        ],
    ));
    let mut outer = message(
        "Outer",
        vec![field("inner", 1, Type::Message, Label::Optional, Some(".shop.Outer.Inner"))],
    );
    outer.nested_type.push(inner);

    let mut file = shop_file(shop_methods());
    file.message_type.push(headers);
    file.message_type.push(outer);
    file
}

fn map_request() -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["shop.proto".into()],
        parameter: Some("configfile=/dev/null".into()),
        proto_file: vec![map_file()],
    }
}

#[test]
fn test_map_names_with_capitals_and_underscores() {
    let artifacts = run(&map_request(), None, "1").unwrap();
    let doc: Value = serde_json::from_str(&artifacts[0].content).unwrap();
    let definitions = &doc["definitions"];

    assert_eq!(
        definitions["Headers"]["properties"]["HTTPHeaders"]["items"]["additionalProperties"],
        json!({"type": "string", "format": "string"})
    );
    assert_eq!(
        definitions["Headers"]["properties"]["aB_c"]["items"]["additionalProperties"],
        json!({"$ref": "#/definitions/Color"})
    );
    assert!(definitions.get("Headers_HTTPHeadersEntry").is_none());
    assert!(definitions.get("Headers_ABCEntry").is_none());

    let package = build_package(&map_request(), "1").unwrap();
    let examples = ExampleSynthesizer::new(&package);
    assert_eq!(
        examples.example("Headers"),
        json!({
            "HTTPHeaders": [{"key1": "string", "key2": "string"}],
            "aB_c": [{"key1": "RED", "key2": "RED"}]
        })
    );
}

#[test]
fn test_map_in_nested_message_with_message_values() {
    let artifacts = run(&map_request(), None, "1").unwrap();
    let doc: Value = serde_json::from_str(&artifacts[0].content).unwrap();
    let definitions = &doc["definitions"];

    assert_eq!(
        definitions["Outer"]["properties"]["inner"],
        json!({"$ref": "#/definitions/Outer_Inner"})
    );
    assert_eq!(
        definitions["Outer_Inner"]["properties"]["items"]["items"]["additionalProperties"],
        json!({"$ref": "#/definitions/Item"})
    );
    assert!(definitions.get("Outer_Inner_ItemsEntry").is_none());

    let package = build_package(&map_request(), "1").unwrap();
    let examples = ExampleSynthesizer::new(&package);
    assert_eq!(
        examples.example("Outer"),
        json!({"inner": {"items": [{"key1": {"id": 0}, "key2": {"id": 0}}]}})
    );
}
