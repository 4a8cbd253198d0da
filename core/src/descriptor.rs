//! # Declaration Subset
//!
//! The parts of `google/protobuf/descriptor.proto`, `google/protobuf/compiler/plugin.proto`
//! and `google/api/http.proto` read by the generator, declared as `prost` messages.
//!
//! Decoding skips every field not declared here, so a full `CodeGeneratorRequest`
//! produced by `protoc` decodes into this subset without loss of the data we need.

/// Request sent by `protoc` to a plugin on stdin.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CodeGeneratorRequest {
    /// The `.proto` files explicitly listed on the command line.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// The generator parameter passed on the command line (`--apidoc_out=<parameter>:<dir>`).
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every file in `file_to_generate` and everything they import, in topological order.
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// Response written by a plugin to stdout.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CodeGeneratorResponse {
    /// Error message; when set, `protoc` reports it and fails.
    #[prost(string, optional, tag = "1")]
    pub error: Option<String>,
    /// Generated files.
    #[prost(message, repeated, tag = "15")]
    pub file: Vec<code_generator_response::File>,
}

/// Nested types of [`CodeGeneratorResponse`].
pub mod code_generator_response {
    /// A single generated file.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct File {
        /// File name, relative to the output directory.
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        /// File content.
        #[prost(string, optional, tag = "15")]
        pub content: Option<String>,
    }
}

/// Describes a complete `.proto` file.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDescriptorProto {
    /// File name, relative to the root of the source tree.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Package name, e.g. `foo.bar`.
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    /// Top-level messages.
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,
    /// Top-level enums.
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<EnumDescriptorProto>,
    /// Services.
    #[prost(message, repeated, tag = "6")]
    pub service: Vec<ServiceDescriptorProto>,
    /// Source locations and comments.
    #[prost(message, optional, tag = "9")]
    pub source_code_info: Option<SourceCodeInfo>,
}

/// Describes a message type.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DescriptorProto {
    /// Message name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Fields, in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub field: Vec<FieldDescriptorProto>,
    /// Nested messages (including synthesized map entries).
    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<DescriptorProto>,
    /// Nested enums.
    #[prost(message, repeated, tag = "4")]
    pub enum_type: Vec<EnumDescriptorProto>,
}

/// Describes a field within a message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldDescriptorProto {
    /// Field name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Field number.
    #[prost(int32, optional, tag = "3")]
    pub number: Option<i32>,
    /// Field label.
    #[prost(enumeration = "field_descriptor_proto::Label", optional, tag = "4")]
    pub label: Option<i32>,
    /// Field type; unset when `type_name` refers to a message or an enum not yet resolved.
    #[prost(enumeration = "field_descriptor_proto::Type", optional, tag = "5")]
    pub r#type: Option<i32>,
    /// Fully-qualified type name for message and enum fields, e.g. `.foo.bar.Baz`.
    #[prost(string, optional, tag = "6")]
    pub type_name: Option<String>,
}

/// Nested types of [`FieldDescriptorProto`].
pub mod field_descriptor_proto {
    /// Field types.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        /// `double`
        Double = 1,
        /// `float`
        Float = 2,
        /// `int64`
        Int64 = 3,
        /// `uint64`
        Uint64 = 4,
        /// `int32`
        Int32 = 5,
        /// `fixed64`
        Fixed64 = 6,
        /// `fixed32`
        Fixed32 = 7,
        /// `bool`
        Bool = 8,
        /// `string`
        String = 9,
        /// Tag-delimited aggregate (proto2 only).
        Group = 10,
        /// Length-delimited aggregate.
        Message = 11,
        /// `bytes`
        Bytes = 12,
        /// `uint32`
        Uint32 = 13,
        /// Enum value.
        Enum = 14,
        /// `sfixed32`
        Sfixed32 = 15,
        /// `sfixed64`
        Sfixed64 = 16,
        /// `sint32`
        Sint32 = 17,
        /// `sint64`
        Sint64 = 18,
    }

    impl Type {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Type::Double => "TYPE_DOUBLE",
                Type::Float => "TYPE_FLOAT",
                Type::Int64 => "TYPE_INT64",
                Type::Uint64 => "TYPE_UINT64",
                Type::Int32 => "TYPE_INT32",
                Type::Fixed64 => "TYPE_FIXED64",
                Type::Fixed32 => "TYPE_FIXED32",
                Type::Bool => "TYPE_BOOL",
                Type::String => "TYPE_STRING",
                Type::Group => "TYPE_GROUP",
                Type::Message => "TYPE_MESSAGE",
                Type::Bytes => "TYPE_BYTES",
                Type::Uint32 => "TYPE_UINT32",
                Type::Enum => "TYPE_ENUM",
                Type::Sfixed32 => "TYPE_SFIXED32",
                Type::Sfixed64 => "TYPE_SFIXED64",
                Type::Sint32 => "TYPE_SINT32",
                Type::Sint64 => "TYPE_SINT64",
            }
        }
    }

    /// Field labels.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Label {
        /// Singular field.
        Optional = 1,
        /// Required field (proto2 only).
        Required = 2,
        /// Repeated field, including map fields.
        Repeated = 3,
    }
}

/// Describes an enum type.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnumDescriptorProto {
    /// Enum name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Values, in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub value: Vec<EnumValueDescriptorProto>,
}

/// Describes a value within an enum.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnumValueDescriptorProto {
    /// Value name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Value number.
    #[prost(int32, optional, tag = "2")]
    pub number: Option<i32>,
}

/// Describes a service.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceDescriptorProto {
    /// Service name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Methods, in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub method: Vec<MethodDescriptorProto>,
}

/// Describes a method of a service.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodDescriptorProto {
    /// Method name.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Fully-qualified input type name.
    #[prost(string, optional, tag = "2")]
    pub input_type: Option<String>,
    /// Fully-qualified output type name.
    #[prost(string, optional, tag = "3")]
    pub output_type: Option<String>,
    /// Method options.
    #[prost(message, optional, tag = "4")]
    pub options: Option<MethodOptions>,
}

/// Method options with the extensions the generator understands.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MethodOptions {
    /// `(apidoc)` content type extension.
    #[prost(message, optional, tag = "50101")]
    pub apidoc: Option<ApiDocRule>,
    /// `(google.api.http)` extension.
    #[prost(message, optional, tag = "72295728")]
    pub http: Option<HttpRule>,
}

/// `google.api.HttpRule`, restricted to the fixed-verb patterns.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HttpRule {
    /// Verb and URL path template.
    #[prost(oneof = "http_rule::Pattern", tags = "2, 3, 4, 5, 6")]
    pub pattern: Option<http_rule::Pattern>,
}

/// Nested types of [`HttpRule`].
pub mod http_rule {
    /// Verb and URL path template.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Pattern {
        /// `GET <path>`
        #[prost(string, tag = "2")]
        Get(String),
        /// `PUT <path>`
        #[prost(string, tag = "3")]
        Put(String),
        /// `POST <path>`
        #[prost(string, tag = "4")]
        Post(String),
        /// `DELETE <path>`
        #[prost(string, tag = "5")]
        Delete(String),
        /// `PATCH <path>`
        #[prost(string, tag = "6")]
        Patch(String),
    }
}

/// `apidoc.ApiDocRule`: request/response media types of a method.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApiDocRule {
    /// Request media type, e.g. `multipart/form-data`.
    #[prost(string, tag = "1")]
    pub consume: String,
    /// Response media type.
    #[prost(string, tag = "2")]
    pub produce: String,
}

/// Source locations and comments of a file.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SourceCodeInfo {
    /// One location per commented or spanned element.
    #[prost(message, repeated, tag = "1")]
    pub location: Vec<source_code_info::Location>,
}

/// Nested types of [`SourceCodeInfo`].
pub mod source_code_info {
    /// A single element location.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Location {
        /// Structural path of the element, as (field number, index) pairs.
        #[prost(int32, repeated, packed = "true", tag = "1")]
        pub path: Vec<i32>,
        /// Comment directly before the element.
        #[prost(string, optional, tag = "3")]
        pub leading_comments: Option<String>,
        /// Comment directly after the element.
        #[prost(string, optional, tag = "4")]
        pub trailing_comments: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_request_roundtrip_keeps_http_rule() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["user.proto".into()],
            parameter: Some("output=swagger".into()),
            proto_file: vec![FileDescriptorProto {
                name: Some("user.proto".into()),
                package: Some("user".into()),
                service: vec![ServiceDescriptorProto {
                    name: Some("UserService".into()),
                    method: vec![MethodDescriptorProto {
                        name: Some("Get".into()),
                        input_type: Some(".user.GetRequest".into()),
                        output_type: Some(".user.User".into()),
                        options: Some(MethodOptions {
                            http: Some(HttpRule {
                                pattern: Some(http_rule::Pattern::Get("/users/{id}".into())),
                            }),
                            apidoc: None,
                        }),
                    }],
                }],
                ..Default::default()
            }],
        };

        let decoded = CodeGeneratorRequest::decode(request.encode_to_vec().as_slice()).unwrap();
        let method = &decoded.proto_file[0].service[0].method[0];
        let http = method.options.as_ref().and_then(|o| o.http.as_ref()).unwrap();
        assert_eq!(
            http.pattern,
            Some(http_rule::Pattern::Get("/users/{id}".into()))
        );
        assert_eq!(decoded.parameter(), "output=swagger");
    }

    #[test]
    fn test_undeclared_fields_are_skipped() {
        // DescriptorProto { name: "E", options: { map_entry: true } }
        let bytes = [0x0a, 0x01, b'E', 0x3a, 0x02, 0x38, 0x01];
        let message = DescriptorProto::decode(&bytes[..]).unwrap();
        assert_eq!(message.name(), "E");

        // HttpRule { get: "/x", body: "*" }
        let rule = HttpRule::decode(&[0x12, 0x02, b'/', b'x', 0x3a, 0x01, b'*'][..]).unwrap();
        assert_eq!(rule.pattern, Some(http_rule::Pattern::Get("/x".into())));
    }

    #[test]
    fn test_field_accessors_default() {
        let field = FieldDescriptorProto::default();
        assert_eq!(field.name(), "");
        assert_eq!(field.label(), field_descriptor_proto::Label::Optional);
        assert_eq!(
            field_descriptor_proto::Type::Bytes.as_str_name(),
            "TYPE_BYTES"
        );
    }
}
