#![deny(missing_docs)]

//! # Renderers
//!
//! Pluggable output documents.
//!
//! - **traits**: [`DocumentRenderer`], implemented once per [`DocumentType`].
//! - **swagger**, **postman**: JSON documents built from serializable views.
//! - **html**, **markdown**: single pages built with `std::fmt::Write`.
//!
//! The package is resolved once into a [`RenderContext`]; every renderer reads
//! the same definitions, operations and examples.

pub mod html;
pub mod markdown;
mod page;
pub mod postman;
pub mod swagger;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
pub use postman::PostmanRenderer;
pub use swagger::SwaggerRenderer;

use crate::config::{Config, DocumentType};
use crate::error::{AppError, AppResult};
use crate::example::ExampleSynthesizer;
use crate::model::{Package, Service};
use crate::schema::{resolve_definitions, resolve_operations, Definitions, Operation};
use tracing::info;

/// A rendered document and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Target file name, relative to the output directory.
    pub file: String,
    /// Document text.
    pub content: String,
}

/// Read-only inputs shared by all renderers of a run.
#[derive(Debug)]
pub struct RenderContext<'a> {
    /// The built package.
    pub package: &'a Package,
    /// Generation options.
    pub config: &'a Config,
    /// Schema definitions, sorted by name.
    pub definitions: Definitions,
    /// Resolved methods, in service order.
    pub operations: Vec<Operation>,
    /// Example payload generator.
    pub examples: ExampleSynthesizer<'a>,
}

impl<'a> RenderContext<'a> {
    /// Resolves `package` for rendering.
    ///
    /// Fails on duplicate routes.
    pub fn new(package: &'a Package, config: &'a Config) -> AppResult<Self> {
        let definitions = resolve_definitions(package);
        let operations = resolve_operations(package, &definitions, &config.header)?;
        Ok(Self {
            package,
            config,
            definitions,
            operations,
            examples: ExampleSynthesizer::new(package),
        })
    }

    /// Document title: the configured title, else the package name.
    pub fn title(&self) -> &str {
        if self.config.title.is_empty() {
            &self.package.name
        } else {
            &self.config.title
        }
    }

    /// Resolved operations of `service`, in declaration order.
    pub fn operations_of<'s>(&'s self, service: &'s Service) -> impl Iterator<Item = &'s Operation> {
        self.operations
            .iter()
            .filter(move |op| op.service == service.name)
    }
}

/// A strategy for one output document format.
pub trait DocumentRenderer {
    /// The format this renderer produces.
    fn document_type(&self) -> DocumentType;

    /// Renders the document text.
    fn render(&self, ctx: &RenderContext<'_>) -> AppResult<String>;
}

/// Every available renderer.
pub fn renderers() -> Vec<Box<dyn DocumentRenderer>> {
    vec![
        Box::new(SwaggerRenderer),
        Box::new(PostmanRenderer),
        Box::new(HtmlRenderer),
        Box::new(MarkdownRenderer),
    ]
}

/// The renderer producing `doc_type`.
pub fn renderer(doc_type: DocumentType) -> AppResult<Box<dyn DocumentRenderer>> {
    renderers()
        .into_iter()
        .find(|r| r.document_type() == doc_type)
        .ok_or_else(|| AppError::UnknownDocumentType(doc_type.to_string()))
}

/// Renders every configured document, in configuration order.
///
/// Any failure aborts the whole run; no partial output is returned.
pub fn generate(package: &Package, config: &Config) -> AppResult<Vec<Artifact>> {
    let ctx = RenderContext::new(package, config)?;

    config
        .document
        .iter()
        .map(|document| {
            let content = renderer(document.doc_type)?.render(&ctx)?;
            info!(
                document = %document.doc_type,
                file = %document.file,
                bytes = content.len(),
                "document generated"
            );
            Ok(Artifact {
                file: document.file.clone(),
                content,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_lookup_matches_type() {
        for doc_type in [
            DocumentType::Swagger,
            DocumentType::Postman,
            DocumentType::Html,
            DocumentType::Markdown,
        ] {
            assert_eq!(renderer(doc_type).unwrap().document_type(), doc_type);
        }
    }

    #[test]
    fn test_each_type_has_one_renderer() {
        let types: Vec<_> = renderers().iter().map(|r| r.document_type()).collect();
        assert_eq!(
            types,
            vec![
                DocumentType::Swagger,
                DocumentType::Postman,
                DocumentType::Html,
                DocumentType::Markdown,
            ]
        );
    }
}
