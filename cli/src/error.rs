#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the plugin binary.

use apidoc_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper (stdin, stdout, output directory).
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Generation failure reported by the core library.
    #[display("{}", _0)]
    Core(AppError),
}

impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
