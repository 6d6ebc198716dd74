//! The DOM abstraction underneath the trellis editing core
//!
//! This crate implements a small headless DOM ([`BaseDocument`]) which is designed to be driven by external code.
//! Most users will want to build one with a wrapper:
//!
//!  - `HtmlDocument` from the `trellis-html` crate parses HTML (or XHTML) into a [`BaseDocument`].
//!
//! It includes: a slab-backed tree representation, attribute storage, inline style parsing, document order
//! comparison, leaf walking, positions and ranges. Block and inline classification lives in `trellis-content`,
//! which is built entirely on the primitives exposed here.
//!
//! Nodes are addressed by `usize` ids into the document's slab. An id stays valid until the node is dropped
//! from the document; structural mutation goes through a [`DocumentMutator`] which bumps the document's
//! [`generation`](BaseDocument::generation) when it is flushed.

// ## Feature flags
//  - `default`: Enables the features listed below.
//  - `tracing`: Enables tracing support.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

mod config;
mod debug;
mod display;
mod mutator;
mod position;
mod range;
mod traversal;

pub mod util;

pub use config::DocumentConfig;
pub use display::{BLOCK_DISPLAY_STYLES, BLOCK_ELEMENT_TAGS};
pub use document::BaseDocument;
pub use markup5ever::{LocalName, Namespace, Prefix, QualName, local_name, ns};
pub use mutator::{AppendTextErr, DocumentMutator};
pub use node::{Attribute, ElementData, Node, NodeData, NodeFlags, TextNodeData};
pub use position::{Position, PositionType};
pub use range::{SelectionRange, compare_boundary_points};
pub use traversal::{AncestorTraverser, TreeTraverser};
