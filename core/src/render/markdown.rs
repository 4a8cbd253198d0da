//! # Markdown Page
//!
//! A single Markdown page: navigation, service index, one section per method
//! with request/response tables and examples, then messages and enums.

use super::page::{field_rows, leader, FieldRow};
use super::{DocumentRenderer, RenderContext};
use crate::config::DocumentType;
use crate::error::AppResult;
use crate::model::Message;
use std::fmt::Write;

const NAV: &str = "[Services](#srv) [Messages](#msg) [Enums](#enu)";
const FIELD_HEADER: &str = "| Field | Type | Label | Description |\n\
                            | :---: | :---: | :---: | :---: |";

/// Renders `apidoc.md`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    fn document_type(&self) -> DocumentType {
        DocumentType::Markdown
    }

    fn render(&self, ctx: &RenderContext<'_>) -> AppResult<String> {
        let mut out = String::new();
        write_header(&mut out, ctx)?;
        write_services(&mut out, ctx)?;
        write_methods(&mut out, ctx)?;
        write_messages(&mut out, ctx)?;
        write_enums(&mut out, ctx)?;
        Ok(out)
    }
}

/// Escapes table-breaking characters.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

fn write_header(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "# {}", ctx.title())?;
    writeln!(out)?;
    writeln!(out, "Package `{}` version `{}`", ctx.package.name, ctx.package.version)?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "## Navigation <a name=\"top\"> </a>")?;
    writeln!(out, "+ [Services](#srv)")?;
    writeln!(out, "+ [Messages](#msg)")?;
    writeln!(out, "+ [Enums](#enu)")?;
    writeln!(out, "---")?;
    writeln!(out)?;
    Ok(())
}

fn write_services(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "## Services <a name=\"srv\"> </a>")?;
    writeln!(out)?;
    for service in &ctx.package.services {
        writeln!(out, "+ ###### {}  [{}]", service.name, cell(&service.description))?;
        for method in &service.methods {
            writeln!(
                out,
                "  + [{}](#{}.{}){}[{}]",
                method.path,
                service.name,
                method.name,
                leader(&method.path),
                cell(&method.description)
            )?;
        }
        writeln!(out)?;
    }
    writeln!(out, "---")?;
    writeln!(out)?;
    Ok(())
}

fn write_fields(out: &mut String, rows: &[FieldRow<'_>]) -> AppResult<()> {
    writeln!(out, "{}", FIELD_HEADER)?;
    for row in rows {
        let type_name = match row.link {
            Some(anchor) => format!("[{}](#{})", row.type_name, anchor),
            None => row.type_name.to_string(),
        };
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            row.name,
            type_name,
            row.label,
            cell(row.description)
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_payload(
    out: &mut String,
    ctx: &RenderContext<'_>,
    heading: &str,
    message: &str,
) -> AppResult<()> {
    writeln!(out, "+ {}", heading)?;
    writeln!(out)?;
    write_fields(out, &field_rows(ctx.package.message(message)))?;
    writeln!(out, "**Example**")?;
    writeln!(out, "```json")?;
    writeln!(out, "{}", ctx.examples.example_json(message)?)?;
    writeln!(out, "```")?;
    Ok(())
}

fn write_methods(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "## Methods")?;
    writeln!(out)?;
    for op in &ctx.operations {
        writeln!(
            out,
            "#### [{}] {} <a name=\"{}.{}\"> </a> {}",
            op.method, op.path, op.service, op.name, NAV
        )?;
        writeln!(out, "```")?;
        writeln!(out, "Service: {}", op.service)?;
        writeln!(out, "Description: {}", op.summary)?;
        if let Some(consume) = &op.consume {
            writeln!(out, "Consumes: {}", consume)?;
        }
        writeln!(out, "Produces: {}", op.produce)?;
        writeln!(out, "```")?;
        write_payload(out, ctx, "Request", &op.request_name)?;
        write_payload(out, ctx, "Response", &op.response_name)?;
        writeln!(out, "---")?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_message(out: &mut String, message: &Message) -> AppResult<()> {
    writeln!(
        out,
        "+ ##### {} <a name=\"{}\"> </a> {}",
        message.name, message.name, NAV
    )?;
    writeln!(out, "```")?;
    writeln!(out, "Description: {}", message.description)?;
    writeln!(out, "```")?;
    writeln!(out)?;
    write_fields(out, &field_rows(Some(message)))
}

fn write_messages(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "## Messages <a name=\"msg\"> </a>")?;
    writeln!(out)?;
    writeln!(out, "| Type | Description |")?;
    writeln!(out, "| :---: | :---: |")?;
    for message in ctx.package.messages.values() {
        writeln!(
            out,
            "| [{}](#{}) | {} |",
            message.name,
            message.name,
            cell(&message.description)
        )?;
    }
    writeln!(out, "---")?;
    for message in ctx.package.messages.values() {
        write_message(out, message)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_enums(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "---")?;
    writeln!(out, "## Enums <a name=\"enu\"> </a>")?;
    writeln!(out)?;
    for enumeration in ctx.package.enums.values() {
        writeln!(
            out,
            "+ ##### {} <a name=\"{}\"> </a> {}",
            enumeration.name, enumeration.name, NAV
        )?;
        writeln!(out, "| Name | Value | Description |")?;
        writeln!(out, "| :---: | :---: | :---: |")?;
        for value in &enumeration.fields {
            writeln!(
                out,
                "| {} | {} | {}: {} |",
                value.name,
                value.value,
                cell(&enumeration.description),
                cell(&value.description)
            )?;
        }
        writeln!(out)?;
    }
    writeln!(out, "---")?;
    Ok(())
}
