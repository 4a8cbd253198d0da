//! Helpers shared by the HTML and Markdown pages.

use crate::model::{JsonType, Message, MessageField};

/// Column at which the dotted leaders of the service index end.
pub const LEADER_WIDTH: usize = 66;

/// Dots filling the gap between `text` and the description column.
pub fn leader(text: &str) -> String {
    "·".repeat(LEADER_WIDTH.saturating_sub(text.chars().count()))
}

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// One row of a field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    /// Anchor of the referenced message or enum.
    pub link: Option<&'a str>,
    pub label: &'static str,
    pub description: &'a str,
}

impl<'a> From<&'a MessageField> for FieldRow<'a> {
    fn from(field: &'a MessageField) -> Self {
        Self {
            name: field.json_name(),
            type_name: field.display_type(),
            link: (field.json_type() == JsonType::Object).then_some(field.proto_type_name.as_str()),
            label: field.json_label().as_str(),
            description: &field.description,
        }
    }
}

/// Rows of `message`, empty when the message is unknown.
pub fn field_rows(message: Option<&Message>) -> Vec<FieldRow<'_>> {
    message
        .map(|m| m.fields.iter().map(FieldRow::from).collect())
        .unwrap_or_default()
}
