//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every variant is fatal for the generation run: all documents share one
//! resolved model, so there is no partial output.

use crate::model::HttpMethod;
use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The plugin request could not be decoded.
    #[display("Decode Error: {_0}")]
    Decode(prost::DecodeError),

    /// JSON serialization failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// YAML configuration parse failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Failure while writing a rendered page.
    #[display("Format Error: {_0}")]
    Fmt(std::fmt::Error),

    /// A type reference that does not split into package + local name.
    #[from(ignore)]
    #[display("split type failed. {_0}")]
    MalformedTypeName(String),

    /// Two methods registered at the same path and verb.
    #[from(ignore)]
    #[display("duplicate route. {path} [{method}]")]
    DuplicateRoute {
        /// URL path template.
        path: String,
        /// HTTP verb.
        method: HttpMethod,
    },

    /// An output document type nobody renders.
    #[from(ignore)]
    #[display("invalid type of \"{_0}\"")]
    UnknownDocumentType(String),

    /// Invalid configuration value.
    /// We ignore this for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
