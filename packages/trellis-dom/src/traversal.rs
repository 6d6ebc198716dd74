use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::{BaseDocument, Node};

type NodeChain = SmallVec<[usize; 16]>;

#[derive(Clone)]
/// An pre-order tree traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct TreeTraverser<'a> {
    doc: &'a BaseDocument,
    stack: Vec<usize>,
}

impl<'a> TreeTraverser<'a> {
    /// Creates a new tree traverser for the given document which starts at the root node.
    pub fn new(doc: &'a BaseDocument) -> Self {
        Self::new_with_root(doc, 0)
    }

    /// Creates a new tree traverser for the given document which starts at the specified node.
    pub fn new_with_root(doc: &'a BaseDocument, root: usize) -> Self {
        let mut stack = Vec::with_capacity(32);
        stack.push(root);
        TreeTraverser { doc, stack }
    }
}
impl Iterator for TreeTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get_node(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}

#[derive(Clone)]
/// An ancestor traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct AncestorTraverser<'a> {
    doc: &'a BaseDocument,
    current: usize,
}
impl<'a> AncestorTraverser<'a> {
    /// Creates a new ancestor traverser for the given document and node ID.
    pub fn new(doc: &'a BaseDocument, node_id: usize) -> Self {
        AncestorTraverser {
            doc,
            current: node_id,
        }
    }
}
impl Iterator for AncestorTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current_node = self.doc.get_node(self.current)?;
        self.current = current_node.parent?;
        Some(self.current)
    }
}

impl BaseDocument {
    /// Whether `node_id` is a descendant of `container_id`.
    /// With `treat_same_as_contain`, a node also contains itself.
    pub fn contains(
        &self,
        container_id: usize,
        node_id: usize,
        treat_same_as_contain: bool,
    ) -> bool {
        if container_id == node_id {
            return treat_same_as_contain && self.get_node(node_id).is_some();
        }
        AncestorTraverser::new(self, node_id).any(|id| id == container_id)
    }

    /// Whether `node_a` comes strictly after `node_b` in document order
    pub fn is_node_after(&self, node_a: usize, node_b: usize) -> bool {
        self.compare_document_order(node_a, node_b) == Ordering::Greater
    }

    /// Compare the document order of two nodes.
    /// Returns Ordering::Less if node_a comes before node_b in document order.
    /// Returns Ordering::Greater if node_a comes after node_b.
    /// Returns Ordering::Equal if they are the same node, or if they are not in the same tree.
    pub fn compare_document_order(&self, node_a: usize, node_b: usize) -> Ordering {
        if node_a == node_b {
            return Ordering::Equal;
        }

        // Build ancestor chains from root to node (inclusive)
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);

        // Find where the chains diverge
        let common_depth = chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(a, b)| a == b)
            .count();

        // Detached subtrees have no order relative to each other
        if common_depth == 0 {
            return Ordering::Equal;
        }

        // If one is an ancestor of the other
        if common_depth == chain_a.len() {
            return Ordering::Less; // node_a is ancestor of node_b
        }
        if common_depth == chain_b.len() {
            return Ordering::Greater; // node_b is ancestor of node_a
        }

        // Compare position among siblings at the divergence point
        let divergent_a = chain_a[common_depth];
        let divergent_b = chain_b[common_depth];
        let parent = &self.nodes[chain_a[common_depth - 1]];

        for &child_id in &parent.children {
            if child_id == divergent_a {
                return Ordering::Less;
            }
            if child_id == divergent_b {
                return Ordering::Greater;
            }
        }

        unreachable!("node {divergent_a} is missing from its parent's child list");
    }

    /// The deepest node which contains both nodes (a node counts as containing itself)
    pub fn common_ancestor(&self, node_a: usize, node_b: usize) -> Option<usize> {
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);
        chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(a, b)| a == b)
            .last()
            .map(|(a, _)| *a)
    }

    /// Build ancestor chain from root to node (inclusive), ordered [root, ..., node].
    fn ancestor_chain_from_root(&self, node_id: usize) -> NodeChain {
        let mut ancestors = NodeChain::new();
        let mut current = self.get_node(node_id).map(|node| node.id);
        while let Some(id) = current {
            ancestors.push(id);
            current = self.nodes[id].parent;
        }
        ancestors.reverse();
        ancestors
    }

    /// The first childless descendant of `root_id`, or `None` if it has no children
    pub fn get_first_leaf_node(&self, root_id: usize) -> Option<usize> {
        self.get_leaf_node(root_id, true)
    }

    /// The last childless descendant of `root_id`, or `None` if it has no children
    pub fn get_last_leaf_node(&self, root_id: usize) -> Option<usize> {
        self.get_leaf_node(root_id, false)
    }

    fn get_leaf_node(&self, root_id: usize, is_first: bool) -> Option<usize> {
        let child = |node: &Node| {
            if is_first {
                node.children.first().copied()
            } else {
                node.children.last().copied()
            }
        };

        let mut result = child(self.get_node(root_id)?)?;
        while let Some(next) = child(&self.nodes[result]) {
            result = next;
        }
        Some(result)
    }

    pub fn get_next_leaf_sibling(&self, root_id: usize, node_id: usize) -> Option<usize> {
        self.get_leaf_sibling(root_id, node_id, true, &[])
    }

    pub fn get_previous_leaf_sibling(&self, root_id: usize, node_id: usize) -> Option<usize> {
        self.get_leaf_sibling(root_id, node_id, false, &[])
    }

    /// The leaf next to `node_id` in document order without leaving `root_id`.
    ///
    /// Elements whose tag is in `skip_tags` (case-insensitive) are neither descended into
    /// nor returned: the walk continues past them.
    pub fn get_leaf_sibling(
        &self,
        root_id: usize,
        node_id: usize,
        is_next: bool,
        skip_tags: &[&str],
    ) -> Option<usize> {
        if !self.contains(root_id, node_id, false) {
            return None;
        }

        let sibling = |node: &Node| {
            if is_next {
                node.next_sibling().map(|n| n.id)
            } else {
                node.previous_sibling().map(|n| n.id)
            }
        };
        let child = |node: &Node| {
            if is_next {
                node.children.first().copied()
            } else {
                node.children.last().copied()
            }
        };
        let is_skipped = |node: &Node| {
            node.element_data()
                .is_some_and(|el| skip_tags.iter().any(|tag| el.is_tag(tag)))
        };

        let mut current = node_id;
        loop {
            // Find the adjacent node, climbing up until a sibling is found or the root is reached
            let mut parent = self.nodes[current].parent;
            let mut next = sibling(&self.nodes[current]);
            while next.is_none() {
                let parent_id = parent.filter(|id| *id != root_id)?;
                next = sibling(&self.nodes[parent_id]);
                parent = self.nodes[parent_id].parent;
            }
            let mut candidate = next?;

            // Then descend to the first/last leaf
            while !is_skipped(&self.nodes[candidate]) {
                match child(&self.nodes[candidate]) {
                    Some(child_id) => candidate = child_id,
                    None => break,
                }
            }

            if !is_skipped(&self.nodes[candidate]) {
                return Some(candidate);
            }
            current = candidate;
        }
    }

    /// The first text node under `root_id` whose content is exactly `text`
    pub fn find_text_node(&self, root_id: usize, text: &str) -> Option<usize> {
        TreeTraverser::new_with_root(self, root_id).find(|id| {
            self.nodes[*id]
                .text_data()
                .is_some_and(|data| data.content == text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <div><span>a<b>b</b></span>c<br></div>
    fn sample() -> (BaseDocument, [usize; 7]) {
        let mut doc = BaseDocument::default();
        let mut mutator = doc.mutate();
        let div = mutator.create_html_element("div");
        let span = mutator.create_html_element("span");
        let a = mutator.create_text_node("a");
        let bold = mutator.create_html_element("b");
        let b = mutator.create_text_node("b");
        let c = mutator.create_text_node("c");
        let br = mutator.create_html_element("br");
        mutator.append_children(0, &[div]);
        mutator.append_children(div, &[span, c, br]);
        mutator.append_children(span, &[a, bold]);
        mutator.append_children(bold, &[b]);
        drop(mutator);
        (doc, [div, span, a, bold, b, c, br])
    }

    #[test]
    fn document_order() {
        let (doc, [div, span, a, _, b, c, br]) = sample();
        assert!(doc.is_node_after(c, b));
        assert!(doc.is_node_after(b, a));
        assert!(doc.is_node_after(a, span));
        assert!(!doc.is_node_after(div, br));
        assert_eq!(doc.compare_document_order(br, br), Ordering::Equal);
        assert_eq!(doc.common_ancestor(b, c), Some(div));
        assert_eq!(doc.common_ancestor(a, b), Some(span));
    }

    #[test]
    fn containment() {
        let (doc, [div, span, a, ..]) = sample();
        assert!(doc.contains(div, a, false));
        assert!(doc.contains(span, a, false));
        assert!(!doc.contains(a, a, false));
        assert!(doc.contains(a, a, true));
        assert!(!doc.contains(a, span, true));
    }

    #[test]
    fn leaves() {
        let (doc, [div, span, a, bold, b, c, br]) = sample();
        assert_eq!(doc.get_first_leaf_node(div), Some(a));
        assert_eq!(doc.get_last_leaf_node(div), Some(br));
        assert_eq!(doc.get_first_leaf_node(a), None);
        assert_eq!(doc.get_next_leaf_sibling(div, a), Some(b));
        assert_eq!(doc.get_next_leaf_sibling(div, b), Some(c));
        assert_eq!(doc.get_next_leaf_sibling(div, br), None);
        assert_eq!(doc.get_previous_leaf_sibling(div, c), Some(b));
        assert_eq!(doc.get_previous_leaf_sibling(span, a), None);
        assert_eq!(doc.get_leaf_sibling(div, a, true, &["B"]), Some(c));
        assert_eq!(doc.get_leaf_sibling(div, c, false, &["b"]), Some(a));
        assert_eq!(doc.get_next_leaf_sibling(bold, b), None);
    }

    #[test]
    fn finds_text() {
        let (doc, [div, .., c, _]) = sample();
        assert_eq!(doc.find_text_node(div, "c"), Some(c));
        assert_eq!(doc.find_text_node(div, "missing"), None);
    }
}
