#![deny(missing_docs)]

//! # protoc-gen-apidoc
//!
//! `protoc` plugin producing API documentation from annotated services.
//!
//! Invoked by `protoc --apidoc_out=<params>:<dir>`, it reads a serialized
//! `CodeGeneratorRequest` on stdin and answers with a `CodeGeneratorResponse`
//! on stdout. For debugging, `--input` and `--output-dir` replace the pipes with
//! files.

use apidoc_core::{decode_request, encode_response, run};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod transport;

/// Version stamp used when the configuration has none.
const VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Parser, Debug)]
#[clap(author, version, about = "protoc plugin generating Swagger, Postman, HTML and Markdown API docs")]
struct Cli {
    /// Read the serialized request from this file instead of stdin.
    #[clap(long, env = "APIDOC_INPUT")]
    input: Option<PathBuf>,

    /// Write the documents into this directory instead of answering on stdout.
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Parameter string replacing the one carried by the request,
    /// e.g. `output=swagger,output=html,title=Shop`.
    #[clap(long)]
    parameter: Option<String>,
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

fn execute(cli: &Cli) -> CliResult<()> {
    let bytes = transport::read_request(cli.input.as_deref())?;
    let request = decode_request(&bytes)?;
    let version = Local::now().format(VERSION_FORMAT).to_string();
    let artifacts = run(&request, cli.parameter.as_deref(), &version)?;

    match &cli.output_dir {
        Some(dir) => {
            transport::write_artifacts(dir, &artifacts)?;
        }
        None => transport::write_response(&encode_response(artifacts))?,
    }
    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("--apidoc_out: {}", err).red());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc_core::descriptor::{CodeGeneratorRequest, FileDescriptorProto};
    use prost::Message;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_file_mode_writes_documents() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("request.bin");
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["empty.proto".into()],
            parameter: None,
            proto_file: vec![FileDescriptorProto {
                name: Some("empty.proto".into()),
                package: Some("empty".into()),
                ..Default::default()
            }],
        };
        fs::write(&input, request.encode_to_vec()).unwrap();

        let out = dir.path().join("out");
        let cli = Cli {
            input: Some(input),
            output_dir: Some(out.clone()),
            parameter: Some("configfile=/dev/null,output=swagger,output=markdown,version=9".into()),
        };
        execute(&cli).unwrap();

        let swagger = fs::read_to_string(out.join("swagger.json")).unwrap();
        assert!(swagger.contains("\"version\": \"9\""));
        assert!(out.join("apidoc.md").exists());
    }

    #[test]
    fn test_empty_request_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("request.bin");
        fs::write(&input, CodeGeneratorRequest::default().encode_to_vec()).unwrap();

        let cli = Cli {
            input: Some(input),
            output_dir: Some(dir.path().join("out")),
            parameter: None,
        };
        let err = execute(&cli).unwrap_err();
        assert_eq!(err.to_string(), "General Error: no file to generate");
    }
}
