#![deny(missing_docs)]

//! # Plugin Processing
//!
//! `protoc` plugin request in, plugin response out.

use crate::builder::build_package;
use crate::config::Config;
use crate::descriptor::code_generator_response::File;
use crate::descriptor::{CodeGeneratorRequest, CodeGeneratorResponse};
use crate::error::{AppError, AppResult};
use crate::render::{generate, Artifact};
use prost::Message;
use tracing::debug;

/// Decodes a serialized `CodeGeneratorRequest`.
pub fn decode_request(bytes: &[u8]) -> AppResult<CodeGeneratorRequest> {
    Ok(CodeGeneratorRequest::decode(bytes)?)
}

/// Runs the pipeline on a decoded request.
///
/// `parameter` overrides the request's own parameter string. The configured
/// version wins over `default_version`.
pub fn run(
    request: &CodeGeneratorRequest,
    parameter: Option<&str>,
    default_version: &str,
) -> AppResult<Vec<Artifact>> {
    if request.file_to_generate.is_empty() {
        return Err(AppError::General("no file to generate".into()));
    }

    let parameter = parameter.unwrap_or(request.parameter());
    debug!(parameter, files = request.proto_file.len(), "processing request");
    let config = Config::from_parameter(parameter)?;

    let version = if config.version.is_empty() {
        default_version
    } else {
        config.version.as_str()
    };
    let package = build_package(request, version)?;
    generate(&package, &config)
}

/// Encodes artifacts as a `CodeGeneratorResponse`.
pub fn encode_response(artifacts: Vec<Artifact>) -> Vec<u8> {
    CodeGeneratorResponse {
        error: None,
        file: artifacts
            .into_iter()
            .map(|a| File {
                name: Some(a.file),
                content: Some(a.content),
            })
            .collect(),
    }
    .encode_to_vec()
}

/// Decodes a request, generates every configured document and encodes the
/// response.
pub fn process(bytes: &[u8], default_version: &str) -> AppResult<Vec<u8>> {
    let request = decode_request(bytes)?;
    let artifacts = run(&request, None, default_version)?;
    Ok(encode_response(artifacts))
}
