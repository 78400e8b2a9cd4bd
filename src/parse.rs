//! The parse engine: a single-pass, non-recursive stack machine.
//!
//! The engine scans the input once, left to right, maintaining an explicit
//! stack of open tags whose bottom entry is a synthetic root spanning the
//! whole input. Malformed or unrecognized bracket content never fails the
//! parse; it degrades to literal text. The only fatal condition is exceeding
//! the configured nesting depth, which aborts without a partial tree.
//!
//! Nesting is bounded by [`ParseOptions::max_depth`], not by the native call
//! stack: the scan loop is iterative, and tree consumers are expected to stay
//! iterative as well.

use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ast::{Node, TagNode, TextNode, TextPosition};
use crate::filter::FilterSet;
use crate::normalize;
use crate::registry::{self, TagRegistry};
use crate::scan;

/// Default open-tag nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Grammar of the text between brackets: optional leading `/`, then a tag
/// name with optional `=options`, or the lone list-item marker. The bare
/// universal close `/` is accepted separately.
static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/?(?:[A-Za-z_-]+(?:=[\S ]+)?|\*)$").expect("tag token pattern")
});

/// Configuration for a single parse call.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open tags; must be greater than zero.
    /// Exceeding it aborts the parse with [`ParseError::DepthExceeded`].
    pub max_depth: usize,
    /// Registry consulted for tag lookups; the standard registry when absent.
    pub registry: Option<Arc<TagRegistry>>,
    /// Root-scope blacklist seed applied below every open tag.
    pub tag_blacklist: Vec<String>,
    /// Root-scope whitelist seed; when present, only listed tags parse at all.
    pub tag_whitelist: Option<Vec<String>>,
    /// Disables the `ignore_filter_when_unlisted` escape hatch of exempt tags.
    pub enforce_filter_on_exempt_tags: bool,
    /// Logs demoted tokens and dumps the finished tree at debug level.
    pub verbose: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            registry: None,
            tag_blacklist: Vec::new(),
            tag_whitelist: None,
            enforce_filter_on_exempt_tags: false,
            verbose: false,
        }
    }
}

/// Fatal parse failure. Anything recoverable degrades to literal text
/// instead; callers seeing this error must treat the input as rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The open-tag stack grew past the configured limit. No tree is produced.
    #[error("nesting depth exceeded: more than {limit} open tags")]
    DepthExceeded { limit: usize },
}

/// An open tag on the stack. `end` stays unset until a close token (or an
/// implicit close rule) determines it; unset ends are resolved on pop.
struct OpenTag {
    node: TagNode,
    end: Option<usize>,
}

/// Raw token split into its close marker, name, and option parts.
fn split_token(raw: &str) -> (bool, &str, Option<&str>) {
    let (closing, rest) = match raw.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    match rest.split_once('=') {
        Some((name, options)) => (closing, name, Some(options)),
        None => (closing, rest, None),
    }
}

fn finalize(mut open: OpenTag, fallback_end: usize) -> TagNode {
    normalize::normalize_children(&mut open.node.content);
    open.node.position.end = open.end.unwrap_or(fallback_end);
    open.node
}

/// Pops the top open tag, finalizes it, and appends it to the new top's
/// content. Document order is preserved: a popped node was opened after every
/// child its parent already holds.
fn pop_into_parent(stack: &mut Vec<OpenTag>, fallback_end: usize, implicit_item_close: bool) {
    if let Some(open) = stack.pop() {
        let mut node = finalize(open, fallback_end);
        if implicit_item_close && node.tag_normalized == "*" {
            node.properly_closed = true;
        }
        if let Some(parent) = stack.last_mut() {
            parent.node.content.push(Node::Tag(node));
        }
    }
}

fn push_text(stack: &mut [OpenTag], node: TextNode) {
    if let Some(top) = stack.last_mut() {
        top.node.content.push(Node::Text(node));
    }
}

fn recompute_filter(stack: &[OpenTag], options: &ParseOptions) -> FilterSet {
    let nodes: Vec<&TagNode> = stack.iter().map(|open| &open.node).collect();
    FilterSet::for_stack(
        &nodes,
        &options.tag_blacklist,
        options.tag_whitelist.as_deref(),
    )
}

/// Where a new list item attaches, if anywhere.
enum ListAnchor {
    /// Index of the nearest open list container; everything above it is cut.
    Container(usize),
    /// An already-closed sibling item was reached first; attach in place.
    ClosedSibling,
    /// No enclosing list exists; the item token degrades to text.
    None,
}

fn find_list_anchor(stack: &[OpenTag]) -> ListAnchor {
    for index in (1..stack.len()).rev() {
        let node = &stack[index].node;
        if registry::is_list_container(&node.tag_normalized) {
            return ListAnchor::Container(index);
        }
        if node.tag_normalized == "*" && node.properly_closed {
            return ListAnchor::ClosedSibling;
        }
    }
    ListAnchor::None
}

/// Parses `text` into an ordered sequence of top-level nodes.
///
/// Unknown tags, invalid closes, stray list items, and grammar-invalid bracket
/// content all degrade to literal text. The sole error is the fatal depth
/// limit, which yields no tree at all.
pub fn parse(text: &str, options: &ParseOptions) -> Result<Vec<Node>, ParseError> {
    let default_registry;
    let registry: &TagRegistry = match &options.registry {
        Some(registry) => registry,
        None => {
            default_registry = TagRegistry::standard();
            &default_registry
        }
    };

    let mut stack: Vec<OpenTag> = vec![OpenTag {
        node: TagNode::new("", None, None, TextPosition::new(0, text.len())),
        end: Some(text.len()),
    }];
    let mut filter = recompute_filter(&stack, options);

    let mut escapes: Vec<usize> = Vec::new();
    let mut cursor = 0usize;

    loop {
        // Next genuine open bracket; everything before it is text.
        let Some(open_at) = scan::next_unescaped(text, cursor, b'[', &mut escapes) else {
            if cursor < text.len() {
                push_text(
                    &mut stack,
                    TextNode::from_span(text, &escapes, cursor, text.len()),
                );
            }
            break;
        };
        if cursor != open_at {
            push_text(
                &mut stack,
                TextNode::from_span(text, &escapes, cursor, open_at),
            );
            escapes.clear();
        }
        cursor = open_at + 1;

        // Matching close bracket; without one the rest of the input is text.
        let Some(close_at) = scan::next_unescaped(text, cursor, b']', &mut escapes) else {
            push_text(
                &mut stack,
                TextNode::from_span(text, &escapes, open_at, text.len()),
            );
            break;
        };

        let raw = &text[cursor..close_at];
        let mut demote = raw != "/" && !TAG_TOKEN.is_match(raw);

        if !demote {
            let (closing, name, token_options) = split_token(raw);
            let normalized = name.to_ascii_lowercase();

            let definition = if normalized.is_empty() {
                None
            } else {
                registry.find(&normalized)
            };

            if !normalized.is_empty() && definition.is_none() {
                // Unknown tags never parse as tags.
                demote = true;
            } else if !filter.accepts(&normalized) {
                let exempt = definition
                    .as_deref()
                    .map(|d| d.ignore_filter_when_unlisted)
                    .unwrap_or(false)
                    && !options.enforce_filter_on_exempt_tags;
                let closes_top = closing
                    && stack.last().map_or(false, |top| {
                        normalized.is_empty() || normalized == top.node.tag_normalized
                    });
                if !exempt && !closes_top {
                    demote = true;
                }
            }

            if !demote {
                if closing {
                    let mut found: Option<usize> = None;
                    for index in (1..stack.len()).rev() {
                        let node = &stack[index].node;
                        if normalized.is_empty() || node.tag_normalized == normalized {
                            found = Some(index);
                            break;
                        }
                        if normalized == "*"
                            && registry::is_list_container(&node.tag_normalized)
                        {
                            // A stray [/*] inside an inner list must not close
                            // an outer list's item.
                            break;
                        }
                    }
                    match found {
                        Some(index) => {
                            stack[index].node.properly_closed = true;
                            stack[index].end = Some(close_at + 1);
                            while stack.len() > index {
                                pop_into_parent(&mut stack, open_at, false);
                            }
                            filter = recompute_filter(&stack, options);
                            escapes.clear();
                        }
                        None => {
                            if options.verbose {
                                debug!(
                                    "close token {:?} at {} matches no open tag; degrading to text",
                                    raw, open_at
                                );
                            }
                            demote = true;
                        }
                    }
                } else {
                    let element = TagNode::new(
                        name,
                        definition.clone(),
                        token_options.map(|o| o.to_string()),
                        TextPosition::new(open_at, close_at + 1),
                    );

                    if normalized == "*" {
                        match find_list_anchor(&stack) {
                            ListAnchor::Container(anchor) => {
                                while stack.len() > anchor + 1 {
                                    let implicit_close = stack.len() == anchor + 2;
                                    pop_into_parent(&mut stack, open_at, implicit_close);
                                }
                                stack.push(OpenTag {
                                    node: element,
                                    end: None,
                                });
                                filter = recompute_filter(&stack, options);
                                escapes.clear();
                            }
                            ListAnchor::ClosedSibling => {
                                stack.push(OpenTag {
                                    node: element,
                                    end: None,
                                });
                                filter = recompute_filter(&stack, options);
                                escapes.clear();
                            }
                            ListAnchor::None => {
                                if options.verbose {
                                    debug!(
                                        "list item at {} has no enclosing list; degrading to text",
                                        open_at
                                    );
                                }
                                demote = true;
                            }
                        }
                    } else if definition.as_deref().map(|d| d.instant_close).unwrap_or(false) {
                        let mut element = element;
                        element.properly_closed = true;
                        element.position.end = close_at + 1;
                        if let Some(top) = stack.last_mut() {
                            top.node.content.push(Node::Tag(element));
                        }
                        escapes.clear();
                    } else {
                        stack.push(OpenTag {
                            node: element,
                            end: None,
                        });
                        filter = recompute_filter(&stack, options);
                        escapes.clear();
                    }
                }
            }
        }

        if demote {
            push_text(
                &mut stack,
                TextNode::from_span(text, &escapes, open_at, close_at + 1),
            );
            escapes.clear();
        }
        cursor = close_at + 1;

        if stack.len() - 1 > options.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: options.max_depth,
            });
        }
    }

    // End of input: every still-open tag stays unclosed and ends at the
    // input boundary.
    while stack.len() > 1 {
        pop_into_parent(&mut stack, text.len(), false);
    }
    let mut result = match stack.pop() {
        Some(root) => root.node.content,
        None => Vec::new(),
    };
    normalize::normalize_children(&mut result);

    if options.verbose {
        dump_tree(&result);
    }
    Ok(result)
}

/// Logs an indented dump of the finished tree at debug level. Iterative, like
/// the engine itself.
fn dump_tree(nodes: &[Node]) {
    let mut work: Vec<(&Node, usize)> = nodes.iter().rev().map(|node| (node, 0)).collect();
    while let Some((node, depth)) = work.pop() {
        let indent = "  ".repeat(depth);
        match node {
            Node::Tag(tag) => {
                debug!(
                    "{}tag {} closed={} range={}..{} children={}",
                    indent,
                    tag.tag_normalized,
                    tag.properly_closed,
                    tag.position.start,
                    tag.position.end,
                    tag.content.len()
                );
                for child in tag.content.iter().rev() {
                    work.push((child, depth + 1));
                }
            }
            Node::Text(text) => {
                debug!(
                    "{}text range={}..{} raw={:?}",
                    indent, text.position.start, text.position.end, text.raw_text
                );
            }
        }
    }
}
