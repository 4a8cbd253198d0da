#![deny(missing_docs)]

//! # API Doc Core
//!
//! Core library of the `protoc` documentation plugin.
//!
//! Pipeline: plugin request → [`builder`] (with [`comments`]) → [`model::Package`]
//! → [`schema`] + [`example`] → [`render`] → artifacts.

/// Shared error types.
pub mod error;

/// Declaration subset decoded from the plugin request.
#[allow(missing_docs)]
pub mod descriptor;

/// Normalized declaration model.
pub mod model;

/// Structural-path comment lookup.
pub mod comments;

/// Declaration tree to package.
pub mod builder;

/// Schema definitions and parameter placement.
pub mod schema;

/// Example payloads.
pub mod example;

/// Generation options.
pub mod config;

/// Output documents.
pub mod render;

/// Request/response processing.
pub mod plugin;

pub use builder::{build_package, build_package_from_files, split_type_name};
pub use comments::{CommentTable, StructuralPath};
pub use config::{Config, Document, DocumentType};
pub use error::{AppError, AppResult};
pub use example::ExampleSynthesizer;
pub use model::{
    ContentType, Enum, EnumField, HttpMethod, JsonLabel, JsonType, Message, MessageField,
    Package, Service, ServiceMethod,
};
pub use plugin::{decode_request, encode_response, process, run};
pub use render::{generate, Artifact, DocumentRenderer, RenderContext};
pub use schema::{
    resolve_definitions, resolve_operations, Definition, Definitions, Operation, Parameter,
    Placement, SchemaType,
};
