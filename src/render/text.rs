//! Plain-text extraction.

use crate::ast::Node;

/// Extracts display text: text nodes are de-escaped, tag markup disappears,
/// and line-break tags become newlines.
pub fn to_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut work: Vec<&Node> = nodes.iter().rev().collect();
    while let Some(node) = work.pop() {
        match node {
            Node::Text(text) => out.push_str(&text.display_text()),
            Node::Tag(tag) => {
                if matches!(tag.tag_normalized.as_str(), "br" | "hr") {
                    out.push('\n');
                }
                for child in tag.content.iter().rev() {
                    work.push(child);
                }
            }
        }
    }
    out
}
