//! # bbtree
//!
//! A tolerant parser for bracket-tag markup (BBCode) that produces a
//! structured, position-annotated document tree.
//!
//! Malformed input never fails the parse: unknown tags, grammar-invalid
//! tokens, unmatched closes, and stray list items all degrade to literal
//! text, matching permissive forum-style markup. The only fatal condition is
//! exceeding the configured nesting depth.
//!
//! ```rust,ignore
//! use bbtree::{parse, ParseOptions, Node};
//!
//! let nodes = parse("[b]bold[/b] and \\[not a tag]", &ParseOptions::default())?;
//! for node in &nodes {
//!     match node {
//!         Node::Tag(tag) => println!("tag {}", tag.tag_normalized),
//!         Node::Text(text) => println!("text {:?}", text.display_text()),
//!     }
//! }
//! ```
//!
//! Custom tags are layered over the standard set via a registry chain:
//!
//! ```rust,ignore
//! use bbtree::{parse, ParseOptions, TagDefinition, TagRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = TagRegistry::with_parent(TagRegistry::standard());
//! registry.register(TagDefinition::new("spoiler"));
//! let options = ParseOptions { registry: Some(Arc::new(registry)), ..Default::default() };
//! let nodes = parse("[spoiler]surprise[/spoiler]", &options)?;
//! ```
//!
//! The `render` module holds the bundled tree consumers: plain-text
//! extraction, canonical markup re-serialization, and HTML generation.

pub mod ast;
pub mod filter;
pub mod normalize;
pub mod parse;
pub mod registry;
pub mod render;
pub mod scan;

pub use ast::{Node, TagNode, TextNode, TextPosition};
pub use parse::{parse, ParseError, ParseOptions, DEFAULT_MAX_DEPTH};
pub use registry::{BlacklistEntry, TagDefinition, TagRegistry};
pub use scan::escape;
