use std::cmp::Ordering;

use crate::traversal::TreeTraverser;
use crate::util::floor_char_boundary;
use crate::{BaseDocument, Position, PositionType};

/// An ordered pair of positions. A collapsed range has equal start and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Position,
    pub end: Position,
}

impl SelectionRange {
    /// Build a range from two positions in either order
    pub fn new(doc: &BaseDocument, start: Position, end: Position) -> Self {
        if compare_boundary_points(doc, &start, &end) == Ordering::Greater {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The range from before `start_node` to after `end_node`
    pub fn from_nodes(doc: &BaseDocument, start_node: usize, end_node: usize) -> Self {
        Self::new(
            doc,
            Position::at(doc, start_node, PositionType::Before),
            Position::at(doc, end_node, PositionType::After),
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.start.node == self.end.node && self.start.offset == self.end.offset
    }

    /// The text of every text node inside the range, cut at the boundary points
    pub fn text(&self, doc: &BaseDocument) -> String {
        let mut out = String::new();
        if self.is_collapsed() {
            return out;
        }
        let Some(ancestor) = doc.common_ancestor(self.start.node, self.end.node) else {
            return out;
        };
        let start = (self.start.node, self.start.offset);
        let end = (self.end.node, self.end.offset);

        for node_id in TreeTraverser::new_with_root(doc, ancestor) {
            let Some(text) = doc.nodes[node_id].text_data() else {
                continue;
            };
            let content = text.content.as_str();

            let from = if node_id == self.start.node {
                self.start.offset
            } else if compare_points(doc, (node_id, 0), start) != Ordering::Less {
                0
            } else {
                continue;
            };
            let to = if node_id == self.end.node {
                self.end.offset
            } else if compare_points(doc, (node_id, content.len()), end) != Ordering::Greater {
                content.len()
            } else {
                continue;
            };

            let from = floor_char_boundary(content, from);
            let to = floor_char_boundary(content, to);
            if from < to {
                out.push_str(&content[from..to]);
            }
        }

        out
    }
}

/// Compare two boundary points following the DOM's boundary point ordering
pub fn compare_boundary_points(doc: &BaseDocument, a: &Position, b: &Position) -> Ordering {
    compare_points(doc, (a.node, a.offset), (b.node, b.offset))
}

fn compare_points(doc: &BaseDocument, a: (usize, usize), b: (usize, usize)) -> Ordering {
    let (node_a, offset_a) = a;
    let (node_b, offset_b) = b;

    if node_a == node_b {
        return offset_a.cmp(&offset_b);
    }

    if doc.is_node_after(node_a, node_b) {
        return compare_points(doc, b, a).reverse();
    }

    // node_a comes first. If it is an ancestor of node_b, the child of node_a containing node_b decides
    if doc.contains(node_a, node_b, false) {
        let mut child = node_b;
        while let Some(parent) = doc.nodes[child].parent {
            if parent == node_a {
                break;
            }
            child = parent;
        }
        let child_index = doc.nodes[child].child_index().unwrap_or_default();
        if child_index < offset_a {
            return Ordering::Greater;
        }
    }

    Ordering::Less
}
