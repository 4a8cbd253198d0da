//! # Comment Correlation
//!
//! Maps structural paths to the comments `protoc` records in `SourceCodeInfo`.
//!
//! A structural path is the sequence of (field number, index) pairs leading from
//! the file to an element, e.g. `[4, 0, 2, 1]` is the second field of the first
//! message. The builder maintains a [`StructuralPath`] while it walks the tree and
//! asks the [`CommentTable`] for the comment recorded at that exact path.

use crate::descriptor::source_code_info::Location;
use crate::descriptor::SourceCodeInfo;
use std::collections::HashMap;

// Tag numbers in FileDescriptorProto.
/// `FileDescriptorProto.message_type`
pub const PATH_MESSAGE: i32 = 4;
/// `FileDescriptorProto.enum_type`
pub const PATH_ENUM: i32 = 5;
/// `FileDescriptorProto.service`
pub const PATH_SERVICE: i32 = 6;

// Tag numbers in DescriptorProto.
/// `DescriptorProto.field`
pub const PATH_MESSAGE_FIELD: i32 = 2;
/// `DescriptorProto.nested_type`
pub const PATH_MESSAGE_MESSAGE: i32 = 3;
/// `DescriptorProto.enum_type`
pub const PATH_MESSAGE_ENUM: i32 = 4;

/// `EnumDescriptorProto.value`
pub const PATH_ENUM_VALUE: i32 = 2;

/// `ServiceDescriptorProto.method`
pub const PATH_SERVICE_METHOD: i32 = 2;

/// The comments attached to one location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Comment directly before the element.
    pub leading: String,
    /// Comment directly after the element.
    pub trailing: String,
}

/// Comments of one file, keyed by structural path.
#[derive(Debug, Clone, Default)]
pub struct CommentTable {
    entries: HashMap<Vec<i32>, Comment>,
}

impl CommentTable {
    /// Builds the table from a file's source code info.
    ///
    /// Locations without any comment are skipped. When two locations share a
    /// path the last one recorded wins.
    pub fn from_source_info(info: Option<&SourceCodeInfo>) -> Self {
        let mut entries = HashMap::new();
        for location in info.map(|i| i.location.as_slice()).unwrap_or_default() {
            if let Some(comment) = comment_from_location(location) {
                entries.insert(location.path.clone(), comment);
            }
        }
        Self { entries }
    }

    /// Returns the comment at `path`: the leading one, else the trailing one,
    /// else `default`.
    pub fn comment(&self, default: &str, path: &[i32]) -> String {
        match self.entries.get(path) {
            Some(c) if !c.leading.is_empty() => c.leading.clone(),
            Some(c) if !c.trailing.is_empty() => c.trailing.clone(),
            _ => default.to_string(),
        }
    }

    /// Number of commented locations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file carries no comments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn comment_from_location(location: &Location) -> Option<Comment> {
    let leading = location.leading_comments.as_deref().unwrap_or_default();
    let trailing = location.trailing_comments.as_deref().unwrap_or_default();
    if leading.is_empty() && trailing.is_empty() {
        return None;
    }

    Some(Comment {
        leading: trim_comment(leading),
        trailing: trim_comment(trailing),
    })
}

/// Strips surrounding whitespace and block-comment artifacts (`*`, newlines).
pub fn trim_comment(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}

/// Position of the element being visited, maintained with push/pop around
/// every descent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralPath(Vec<i32>);

impl StructuralPath {
    /// Path of a top-level element, e.g. `[PATH_MESSAGE, 3]`.
    pub fn root(tag: i32, index: usize) -> Self {
        let mut path = Self::default();
        path.push(tag, index);
        path
    }

    /// Descends into child `index` of the repeated field `tag`.
    pub fn push(&mut self, tag: i32, index: usize) {
        self.0.push(tag);
        self.0.push(i32::try_from(index).unwrap_or(i32::MAX));
    }

    /// Returns to the parent element.
    pub fn pop(&mut self) {
        let len = self.0.len().saturating_sub(2);
        self.0.truncate(len);
    }

    /// The raw path.
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}
