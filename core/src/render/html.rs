//! # HTML Page
//!
//! Same layout as the Markdown page, as one self-contained HTML document.
//! All declaration text is escaped.

use super::page::{escape_html as esc, field_rows, leader, FieldRow};
use super::{DocumentRenderer, RenderContext};
use crate::config::DocumentType;
use crate::error::AppResult;
use std::fmt::Write;

const STYLE: &str = r#"    body { margin: 0 auto; max-width: 1100px; padding: 0 24px; font-family: "Helvetica Neue", Helvetica, Arial, sans-serif; font-size: 14px; color: #333; }
    #header h1 { border-bottom: 1px solid #ccc; padding-bottom: 8px; }
    a { color: #0366d6; text-decoration: none; }
    a:hover { text-decoration: underline; }
    ul.index { list-style: none; padding-left: 0; font-family: Menlo, Consolas, monospace; }
    ul.index ul { list-style: none; padding-left: 24px; }
    h2.api { margin-top: 36px; padding: 6px 10px; background: #f6f8fa; border-left: 4px solid #0366d6; font-size: 16px; }
    .meta { color: #696969; }
    .pure-table { border-collapse: collapse; border-spacing: 0; border: 1px solid #cbcbcb; width: 100%; margin: 8px 0 16px; }
    .pure-table th, .pure-table td { border-left: 1px solid #cbcbcb; padding: 6px 12px; text-align: left; }
    .pure-table thead { background-color: #e0e0e0; }
    .pure-table-odd td { background-color: #f2f2f2; }
    .codeblock { background: #f6f8fa; border: 1px solid #e1e4e8; border-radius: 3px; padding: 12px; font-family: Menlo, Consolas, monospace; white-space: pre; overflow-x: auto; }
    .nav { float: right; font-size: 12px; font-weight: normal; }
"#;

const NAV: &str = r##"<span class="nav"><a href="#srv">Services</a> <a href="#msg">Messages</a> <a href="#enu">Enums</a></span>"##;

/// Renders `apidoc.html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn document_type(&self) -> DocumentType {
        DocumentType::Html
    }

    fn render(&self, ctx: &RenderContext<'_>) -> AppResult<String> {
        let mut out = String::new();
        let title = esc(ctx.title());

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "  <meta charset=\"utf-8\">")?;
        writeln!(out, "  <title>{}</title>", title)?;
        writeln!(out, "  <style>\n{}  </style>", STYLE)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(
            out,
            "  <p class=\"meta\">package: {} &middot; version: {}</p>",
            esc(&ctx.package.name),
            esc(&ctx.package.version)
        )?;
        writeln!(out, "  <div id=\"header\"><h1>{}</h1></div>", title)?;

        write_services(&mut out, ctx)?;
        write_methods(&mut out, ctx)?;
        write_messages(&mut out, ctx)?;
        write_enums(&mut out, ctx)?;

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }
}

fn row_class(index: usize) -> &'static str {
    if index % 2 == 0 {
        " class=\"pure-table-odd\""
    } else {
        ""
    }
}

fn write_services(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "  <h2><a id=\"srv\">Services</a></h2>")?;
    writeln!(out, "  <ul class=\"index\">")?;
    for service in &ctx.package.services {
        writeln!(
            out,
            "    <li>{}{}[{}]",
            esc(&service.name),
            leader(&service.name),
            esc(&service.description)
        )?;
        writeln!(out, "      <ul>")?;
        for op in ctx.operations_of(service) {
            let route = format!("[{}] {}", op.method, op.path);
            writeln!(
                out,
                "        <li><a href=\"#{}.{}\">{}</a>{}[{}]</li>",
                esc(&op.service),
                esc(&op.name),
                esc(&route),
                leader(&route),
                esc(&op.summary)
            )?;
        }
        writeln!(out, "      </ul>")?;
        writeln!(out, "    </li>")?;
    }
    writeln!(out, "  </ul>")?;
    Ok(())
}

fn write_fields(out: &mut String, rows: &[FieldRow<'_>]) -> AppResult<()> {
    writeln!(out, "  <table class=\"pure-table\">")?;
    writeln!(
        out,
        "    <thead><tr><th>Field</th><th>Type</th><th>Label</th><th>Description</th></tr></thead>"
    )?;
    writeln!(out, "    <tbody>")?;
    for (index, row) in rows.iter().enumerate() {
        let type_name = match row.link {
            Some(anchor) => format!("<a href=\"#{}\">{}</a>", esc(anchor), esc(row.type_name)),
            None => esc(row.type_name),
        };
        writeln!(
            out,
            "      <tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row_class(index),
            esc(row.name),
            type_name,
            row.label,
            esc(row.description)
        )?;
    }
    writeln!(out, "    </tbody>")?;
    writeln!(out, "  </table>")?;
    Ok(())
}

fn write_payload(
    out: &mut String,
    ctx: &RenderContext<'_>,
    heading: &str,
    message: &str,
) -> AppResult<()> {
    writeln!(out, "  <h3>{}</h3>", heading)?;
    write_fields(out, &field_rows(ctx.package.message(message)))?;
    writeln!(out, "  <h4>Example</h4>")?;
    writeln!(
        out,
        "  <pre><div class=\"codeblock\">{}</div></pre>",
        esc(&ctx.examples.example_json(message)?)
    )?;
    Ok(())
}

fn write_methods(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    for op in &ctx.operations {
        writeln!(
            out,
            "  <h2 class=\"api\"><a id=\"{}.{}\">[{}] {}</a>{}</h2>",
            esc(&op.service),
            esc(&op.name),
            op.method,
            esc(&op.path),
            NAV
        )?;
        writeln!(out, "  <p class=\"meta\">")?;
        writeln!(out, "    Service: {}<br>", esc(&op.service))?;
        writeln!(out, "    Description: {}<br>", esc(&op.summary))?;
        if let Some(consume) = &op.consume {
            writeln!(out, "    Consumes: {}<br>", esc(consume.as_str()))?;
        }
        writeln!(out, "    Produces: {}", esc(op.produce.as_str()))?;
        writeln!(out, "  </p>")?;
        write_payload(out, ctx, "Request", &op.request_name)?;
        write_payload(out, ctx, "Response", &op.response_name)?;
    }
    Ok(())
}

fn write_messages(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "  <h2><a id=\"msg\">Messages</a>{}</h2>", NAV)?;
    writeln!(out, "  <table class=\"pure-table\">")?;
    writeln!(out, "    <thead><tr><th>Type</th><th>Description</th></tr></thead>")?;
    writeln!(out, "    <tbody>")?;
    for (index, message) in ctx.package.messages.values().enumerate() {
        writeln!(
            out,
            "      <tr{}><td><a href=\"#{}\">{}</a></td><td>{}</td></tr>",
            row_class(index),
            esc(&message.name),
            esc(&message.name),
            esc(&message.description)
        )?;
    }
    writeln!(out, "    </tbody>")?;
    writeln!(out, "  </table>")?;

    for message in ctx.package.messages.values() {
        writeln!(out, "  <h3><a id=\"{}\">{}</a>{}</h3>", esc(&message.name), esc(&message.name), NAV)?;
        writeln!(out, "  <p class=\"meta\">Description: {}</p>", esc(&message.description))?;
        write_fields(out, &field_rows(Some(message)))?;
    }
    Ok(())
}

fn write_enums(out: &mut String, ctx: &RenderContext<'_>) -> AppResult<()> {
    writeln!(out, "  <h2><a id=\"enu\">Enums</a>{}</h2>", NAV)?;
    for enumeration in ctx.package.enums.values() {
        writeln!(
            out,
            "  <h4><a id=\"{}\">{}</a></h4>",
            esc(&enumeration.name),
            esc(&enumeration.name)
        )?;
        writeln!(out, "  <table class=\"pure-table\">")?;
        writeln!(out, "    <thead><tr><th>Name</th><th>Value</th><th>Description</th></tr></thead>")?;
        writeln!(out, "    <tbody>")?;
        for (index, value) in enumeration.fields.iter().enumerate() {
            writeln!(
                out,
                "      <tr{}><td>{}</td><td>{}</td><td>{}: {}</td></tr>",
                row_class(index),
                esc(&value.name),
                value.value,
                esc(&enumeration.description),
                esc(&value.description)
            )?;
        }
        writeln!(out, "    </tbody>")?;
        writeln!(out, "  </table>")?;
    }
    Ok(())
}
