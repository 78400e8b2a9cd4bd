//! Tree normalization: deductible-tag rewriting and text merging.
//!
//! Runs over a node's direct children every time that node is popped from the
//! open-tag stack, and once more over the top-level sequence when the scan
//! finishes. Children are first demoted where they carry no tag information,
//! then adjacent plain text nodes are merged.

use crate::ast::{Node, TextNode};

/// Normalizes a child sequence in place.
///
/// An empty, never-closed tag node is rewritten to a text node reproducing
/// its opening token verbatim at the same position. Afterwards, adjacent text
/// nodes merge left-to-right, but only when neither side carries pending
/// escape offsets (merging would invalidate the offsets of the right node).
pub fn normalize_children(children: &mut Vec<Node>) {
    for child in children.iter_mut() {
        if let Node::Tag(tag) = child {
            if tag.is_deductible() {
                *child = Node::Text(TextNode::from_raw(tag.opening_token(), tag.position));
            }
        }
    }

    let mut index = 0;
    while index + 1 < children.len() {
        let mergeable = match (&children[index], &children[index + 1]) {
            (Node::Text(left), Node::Text(right)) => {
                left.escape_offsets.is_empty() && right.escape_offsets.is_empty()
            }
            _ => false,
        };
        if !mergeable {
            index += 1;
            continue;
        }
        if let Node::Text(right) = children.remove(index + 1) {
            if let Node::Text(left) = &mut children[index] {
                left.raw_text.push_str(&right.raw_text);
                left.position.end = right.position.end;
            }
        }
    }
}
