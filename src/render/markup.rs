//! Canonical BBCode re-serialization.
//!
//! Reproduces markup from the tree: text nodes emit their raw text with
//! escapes intact, tag nodes emit their opening token, content, and a close
//! token. Instant-close tags emit no close token, so their serialization
//! parses back to the same shape.

use crate::ast::{Node, TagNode};

enum Step<'a> {
    Node(&'a Node),
    Close(&'a TagNode),
}

/// Serializes the tree back to BBCode markup.
pub fn to_markup(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut work: Vec<Step> = nodes.iter().rev().map(Step::Node).collect();
    while let Some(step) = work.pop() {
        match step {
            Step::Node(Node::Text(text)) => out.push_str(&text.raw_text),
            Step::Node(Node::Tag(tag)) => {
                out.push_str(&tag.opening_token());
                let instant = tag
                    .definition
                    .as_deref()
                    .map(|d| d.instant_close)
                    .unwrap_or(false);
                if !instant {
                    work.push(Step::Close(tag));
                    for child in tag.content.iter().rev() {
                        work.push(Step::Node(child));
                    }
                }
            }
            Step::Close(tag) => {
                out.push_str("[/");
                out.push_str(&tag.tag);
                out.push(']');
            }
        }
    }
    out
}
