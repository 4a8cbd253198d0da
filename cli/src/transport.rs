#![deny(missing_docs)]

//! # Transport
//!
//! Moves the plugin request in and the generated documents out: stdin/stdout
//! when `protoc` drives the binary, plain files when run by hand.

use crate::error::CliResult;
use apidoc_core::Artifact;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the serialized request from `input`, or stdin when `None`.
pub fn read_request(input: Option<&Path>) -> CliResult<Vec<u8>> {
    match input {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Writes an encoded response to stdout.
pub fn write_response(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}

/// Writes each artifact under `dir`, creating it when missing.
///
/// Returns the written paths in artifact order.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> CliResult<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.content)?;
        info!(path = %path.display(), "document written");
        written.push(path);
    }
    Ok(written)
}
