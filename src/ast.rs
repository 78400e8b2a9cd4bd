//! Node model for parsed BBCode documents.
//!
//! A parse produces an ordered sequence of [`Node`]s, each annotated with the
//! byte range of the original input it was built from. Tag nodes keep the tag
//! token exactly as written plus a lowercased form used for all lookups; text
//! nodes keep the raw input substring together with the escape markers that
//! must be deleted to obtain display text.

use std::sync::Arc;

use serde::Serialize;

use crate::registry::TagDefinition;

/// Half-open byte range `[start, end)` into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextPosition {
    pub start: usize,
    pub end: usize,
}

impl TextPosition {
    pub fn new(start: usize, end: usize) -> Self {
        TextPosition { start, end }
    }

    /// Length of the covered range in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node of the parsed tree.
///
/// Visitors should match exhaustively on the two variants; there are no other
/// node kinds and none will be added without a breaking release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Tag(TagNode),
    Text(TextNode),
}

impl Node {
    /// Byte range of the input this node was built from.
    pub fn position(&self) -> TextPosition {
        match self {
            Node::Tag(tag) => tag.position,
            Node::Text(text) => text.position,
        }
    }

    pub fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Tag(_) => None,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Node::Tag(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

/// A recognized bracket tag together with its parsed content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagNode {
    /// The tag token exactly as written, case preserved.
    pub tag: String,
    /// Lowercased tag token; the sole key used for registry and filter lookups.
    pub tag_normalized: String,
    /// Resolved registry entry. Absent only on the synthetic root node; every
    /// tag that reaches the tree was resolved during parsing.
    #[serde(skip)]
    pub definition: Option<Arc<TagDefinition>>,
    /// Raw option string following `=`, e.g. `red` in `[color=red]`.
    pub options: Option<String>,
    /// Child nodes in document order.
    pub content: Vec<Node>,
    /// Whether a matching close token (or an implicit close rule) ended this tag.
    pub properly_closed: bool,
    pub position: TextPosition,
}

impl TagNode {
    pub fn new(
        tag: &str,
        definition: Option<Arc<TagDefinition>>,
        options: Option<String>,
        position: TextPosition,
    ) -> Self {
        TagNode {
            tag: tag.to_string(),
            tag_normalized: tag.to_ascii_lowercase(),
            definition,
            options,
            content: Vec::new(),
            properly_closed: false,
            position,
        }
    }

    /// An empty tag that was never closed carries no information beyond its
    /// opening token and may be rewritten to literal text by the normalizer.
    pub fn is_deductible(&self) -> bool {
        self.content.is_empty() && !self.properly_closed
    }

    /// Reconstructs the opening token verbatim: `[tag]` or `[tag=options]`.
    pub fn opening_token(&self) -> String {
        match &self.options {
            Some(options) => format!("[{}={}]", self.tag, options),
            None => format!("[{}]", self.tag),
        }
    }
}

/// A literal text span of the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    /// Substring of the original input, escapes still present.
    pub raw_text: String,
    /// Offsets into `raw_text` of backslash characters to delete when
    /// producing display text. Always sorted descending.
    pub escape_offsets: Vec<usize>,
    pub position: TextPosition,
}

impl TextNode {
    /// Builds a text node from the input span `[start, end)`, translating the
    /// absolute escape-marker positions collected by the scanner into offsets
    /// relative to the span. Markers outside the span are discarded.
    pub fn from_span(input: &str, escapes: &[usize], start: usize, end: usize) -> Self {
        let mut escape_offsets: Vec<usize> = escapes
            .iter()
            .filter(|&&at| at >= start && at < end)
            .map(|&at| at - start)
            .collect();
        // Descending order is a contract of the field, not an accident of how
        // the scanner happened to collect markers.
        escape_offsets.sort_unstable_by(|a, b| b.cmp(a));
        TextNode {
            raw_text: input[start..end].to_string(),
            escape_offsets,
            position: TextPosition::new(start, end),
        }
    }

    /// Builds a text node from already-final text with no pending escapes.
    pub fn from_raw(raw_text: String, position: TextPosition) -> Self {
        TextNode {
            raw_text,
            escape_offsets: Vec::new(),
            position,
        }
    }

    /// The text as it should be displayed: `raw_text` with the escape
    /// characters removed. Offsets are processed in descending order so each
    /// removal leaves the remaining offsets valid.
    pub fn display_text(&self) -> String {
        if self.escape_offsets.is_empty() {
            return self.raw_text.clone();
        }
        let mut text = self.raw_text.clone();
        for &offset in &self.escape_offsets {
            if offset < text.len() {
                text.remove(offset);
            }
        }
        text
    }
}
