//! Renderers consuming the finished node tree.
//!
//! Each renderer is a pure function over the node sequence returned by
//! [`parse`](crate::parse::parse): it dispatches on the node kind and, for tag
//! nodes, on `tag_normalized`, with a pass-through fallback for tags it does
//! not special-case. All traversals are iterative, matching the engine's own
//! non-recursive design, so deeply nested trees cannot overflow the call
//! stack.

pub mod html;
pub mod markup;
pub mod text;

pub use html::to_html;
pub use markup::to_markup;
pub use text::to_text;
