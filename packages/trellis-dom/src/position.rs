//! Caret positions inside a [`BaseDocument`].
//!
//! A position is a `(node, offset)` boundary point, as in the DOM: for a text node the offset
//! is a byte offset into its content, for any other node it is a child index.

use crate::BaseDocument;
use crate::util::floor_char_boundary;

/// How to build a position relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionType {
    /// Inside the node, before its first child (or character)
    Begin,
    /// Inside the node, after its last child (or character)
    End,
    /// In the node's parent, immediately before the node
    Before,
    /// In the node's parent, immediately after the node
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: usize,
    pub offset: usize,
    /// The closest element among `node` and its ancestors
    pub element: Option<usize>,
    /// Whether the offset is at the end of a non-empty node
    pub is_at_end: bool,
}

impl Position {
    /// A position inside `node` at `offset`. The offset is clamped to the node's end offset
    /// (and, for text, to a char boundary).
    pub fn new(doc: &BaseDocument, node: usize, offset: usize) -> Self {
        let (end_offset, offset) = match doc.get_node(node) {
            Some(n) => {
                let end = n.end_offset();
                let offset = match n.text_data() {
                    Some(text) => floor_char_boundary(&text.content, offset),
                    None => offset.min(end),
                };
                (end, offset)
            }
            None => (0, 0),
        };

        Self {
            node,
            offset,
            element: doc.closest_element(node),
            is_at_end: offset > 0 && offset >= end_offset,
        }
    }

    /// A position relative to `node`.
    ///
    /// `Before` and `After` on a node without a parent fall back to `Begin` and `End`.
    pub fn at(doc: &BaseDocument, node: usize, position_type: PositionType) -> Self {
        let parent_and_index = doc
            .get_node(node)
            .and_then(|n| Some((n.parent?, n.child_index()?)));

        match (position_type, parent_and_index) {
            (PositionType::Begin, _) | (PositionType::Before, None) => Self::new(doc, node, 0),
            (PositionType::End, _) | (PositionType::After, None) => {
                let end_offset = doc.get_node(node).map_or(0, |n| n.end_offset());
                Self {
                    node,
                    offset: end_offset,
                    element: doc.closest_element(node),
                    is_at_end: true,
                }
            }
            (PositionType::Before, Some((parent, index))) => Self {
                node: parent,
                offset: index,
                element: doc.closest_element(parent),
                is_at_end: false,
            },
            (PositionType::After, Some((parent, index))) => Self {
                node: parent,
                offset: index + 1,
                element: doc.closest_element(parent),
                is_at_end: doc.nodes[node].next_sibling().is_none(),
            },
        }
    }

    /// Descend into element children until the position sits in a text node or a leaf
    pub fn normalize(&self, doc: &BaseDocument) -> Self {
        let Some(node) = doc.get_node(self.node) else {
            return *self;
        };
        if node.is_text_node() || node.is_leaf() {
            return *self;
        }

        let mut node = node;
        let mut offset = self.offset;
        let at_end = self.is_at_end;
        while !node.is_text_node() {
            let next = if at_end {
                node.last_child()
            } else {
                node.children.get(offset).map(|id| node.with(*id))
            };
            match next {
                Some(next) => {
                    node = next;
                    offset = if at_end { node.end_offset() } else { 0 };
                }
                None => break,
            }
        }

        if at_end || (offset > 0 && offset == node.end_offset()) {
            Self::at(doc, node.id, PositionType::End)
        } else {
            Self::new(doc, node.id, offset)
        }
    }

    /// Whether this position is strictly after `other`
    pub fn is_after(&self, doc: &BaseDocument, other: &Position) -> bool {
        if self.node == other.node {
            (self.is_at_end && !other.is_at_end) || self.offset > other.offset
        } else {
            doc.is_node_after(self.node, other.node)
        }
    }

    pub fn equal_to(&self, other: &Position) -> bool {
        self.node == other.node && self.offset == other.offset && self.is_at_end == other.is_at_end
    }
}
