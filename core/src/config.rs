#![deny(missing_docs)]

//! # Configuration
//!
//! Generation options come from two sources:
//!
//! - the plugin parameter string, `key=value` pairs separated by `,`
//!   (e.g. `--apidoc_out=host=api.example.com,output=swagger,output=html:.`);
//! - an optional YAML file named by the `configfile` key (default `apidoc.yaml`).
//!
//! Parameter values override file values; list values are appended.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Config file read when no `configfile` key is given.
pub const DEFAULT_CONFIG_FILE: &str = "apidoc.yaml";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Kind of output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DocumentType {
    /// Swagger 2.0 JSON.
    Swagger,
    /// Postman collection v2.1 JSON.
    Postman,
    /// Single HTML page.
    Html,
    /// Single Markdown page.
    Markdown,
}

impl DocumentType {
    /// Configuration name, e.g. `swagger`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Swagger => "swagger",
            DocumentType::Postman => "postman",
            DocumentType::Html => "html",
            DocumentType::Markdown => "markdown",
        }
    }

    /// File name used when the document names none.
    ///
    /// With a title `T` the name is derived from the lower-cased title.
    pub fn default_file(&self, title: &str) -> String {
        let title = title.to_lowercase();
        match (self, title.is_empty()) {
            (DocumentType::Swagger, true) => "swagger.json".into(),
            (DocumentType::Swagger, false) => format!("{}.swagger.json", title),
            (DocumentType::Postman, true) => "postman.json".into(),
            (DocumentType::Postman, false) => format!("{}.postman.json", title),
            (DocumentType::Html, true) => "apidoc.html".into(),
            (DocumentType::Html, false) => format!("{}.html", title),
            (DocumentType::Markdown, true) => "apidoc.md".into(),
            (DocumentType::Markdown, false) => format!("{}.md", title),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swagger" => Ok(DocumentType::Swagger),
            "postman" => Ok(DocumentType::Postman),
            "html" => Ok(DocumentType::Html),
            "markdown" => Ok(DocumentType::Markdown),
            other => Err(AppError::UnknownDocumentType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DocumentType {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One requested output document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Document kind.
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Output file name; empty means [`DocumentType::default_file`].
    #[serde(default)]
    pub file: String,
}

impl Document {
    /// A document written to the default file name.
    pub fn new(doc_type: DocumentType) -> Self {
        Self {
            doc_type,
            file: String::new(),
        }
    }
}

/// Resolved generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API host, lower-cased.
    pub host: String,
    /// API port.
    pub port: Option<u16>,
    /// Document title; the package name when empty.
    pub title: String,
    /// Document version; supplied by the caller when empty.
    pub version: String,
    /// Header names sent with every request.
    pub header: Vec<String>,
    /// Transfer schemes, e.g. `https`.
    pub scheme: Vec<String>,
    /// Requested documents in output order.
    pub document: Vec<Document>,
}

impl Config {
    /// Resolves the configuration from a plugin parameter string.
    ///
    /// A config file named by `configfile` must exist; the default
    /// [`DEFAULT_CONFIG_FILE`] is read only when present.
    pub fn from_parameter(parameter: &str) -> AppResult<Self> {
        let pairs = parse_pairs(parameter);

        let explicit = pairs
            .iter()
            .rev()
            .find(|(k, _)| *k == "configfile")
            .map(|(_, v)| *v);

        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        for (key, value) in pairs {
            config.apply(key, value)?;
        }

        Ok(config.finish())
    }

    /// Reads a YAML config file. Defaults are not applied.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading config file");
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses YAML config text. Defaults are not applied.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies one `key=value` parameter.
    pub fn apply(&mut self, key: &str, value: &str) -> AppResult<()> {
        match key {
            "configfile" => {}
            "host" => self.host = value.to_string(),
            "port" => {
                let port = value
                    .parse()
                    .map_err(|_| AppError::Config(format!("invalid port \"{}\"", value)))?;
                self.port = Some(port);
            }
            "title" => self.title = value.to_string(),
            "version" => self.version = value.to_string(),
            "header" => self.header.push(value.to_string()),
            "scheme" => self.scheme.push(value.to_string()),
            "output" => self.document.push(Document::new(value.parse()?)),
            other => warn!(key = other, "ignoring unknown parameter"),
        }
        Ok(())
    }

    /// Applies defaults: host, a swagger document when none is requested, and
    /// file names derived from the title.
    pub fn finish(mut self) -> Self {
        self.host = if self.host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            self.host.to_lowercase()
        };

        if self.document.is_empty() {
            debug!("no document requested, using swagger");
            self.document.push(Document::new(DocumentType::Swagger));
        }

        for document in &mut self.document {
            if document.file.is_empty() {
                document.file = document.doc_type.default_file(&self.title);
            }
        }
        self
    }

    /// Base URL of the API, `<scheme>://<host>[:<port>]`.
    ///
    /// A host that already carries a scheme keeps it; otherwise the first
    /// configured scheme is used, then `http`.
    pub fn address(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let base = if host.contains("://") {
            host.to_string()
        } else {
            let scheme = self.scheme.first().map(String::as_str).unwrap_or("http");
            format!("{}://{}", scheme, host)
        };
        match self.port {
            Some(port) => format!("{}:{}", base, port),
            None => base,
        }
    }

    /// `host[:port]` without scheme, as written into a Swagger document.
    pub fn host_with_port(&self) -> String {
        let host = self
            .host
            .split_once("://")
            .map_or(self.host.as_str(), |(_, rest)| rest)
            .trim_end_matches('/');
        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

fn parse_pairs(parameter: &str) -> Vec<(&str, &str)> {
    parameter
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (p, ""),
        })
        .collect()
}
