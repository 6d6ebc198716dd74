//! Block and inline content model for the trellis editing core
//!
//! Classifies the nodes of a [`BaseDocument`](trellis_dom::BaseDocument) into paragraph-like
//! [blocks](BlockElement) and the [inline runs](InlineElement) inside them, and restructures
//! the tree when a block has to become a single element.
//!
//! Classification is read-only and takes `&BaseDocument`. Anything which restructures the tree
//! takes `&mut BaseDocument` and applies its changes through one
//! [`DocumentMutator`](trellis_dom::DocumentMutator).

// ## Feature flags
//  - `default`: Enables the features listed below.
//  - `tracing`: Enables tracing support.

mod block;
mod collapse;
mod error;
mod inline;
mod scoper;
mod traverser;

pub use block::{
    BlockElement, NodeBlockElement, StartEndBlockElement, get_block_element_at_node,
    get_first_block_element, get_last_block_element, get_next_previous_block_element,
};
pub use collapse::{
    collapse_nodes, find_collapsed_nodes, split_balanced_node_range, split_parent_node, unwrap,
    wrap,
};
pub use error::ContentError;
pub use inline::{
    EmptyInlineElement, InlineElement, InlineKind, NodeInlineElement, PartialInlineElement,
    get_first_inline_element, get_inline_element_at_node, get_inline_element_before_after,
    get_last_inline_element, get_next_previous_inline_element,
};
pub use scoper::{BodyScoper, PositionOrRange, Scoper, SelectionBlockScoper, StartFrom};
pub use traverser::ContentTraverser;
