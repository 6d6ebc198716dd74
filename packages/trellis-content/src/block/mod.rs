//! Block elements: the paragraph-like units content is split into.
//!
//! A block is either a single node whose subtree is the whole block ([`NodeBlockElement`]), or a
//! run of content between a start node and an end node which has no dedicated wrapper
//! ([`StartEndBlockElement`]), e.g. the text before a `<br>` directly inside a `<div>`.

mod node_block;
mod start_end_block;

pub use node_block::NodeBlockElement;
pub use start_end_block::StartEndBlockElement;

use trellis_dom::BaseDocument;

use crate::ContentError;
use crate::collapse::find_collapsed_nodes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockElement {
    Node(NodeBlockElement),
    StartEnd(StartEndBlockElement),
}

impl BlockElement {
    pub fn start_node(&self) -> usize {
        match self {
            BlockElement::Node(block) => block.node(),
            BlockElement::StartEnd(block) => block.start_node(),
        }
    }

    pub fn end_node(&self) -> usize {
        match self {
            BlockElement::Node(block) => block.node(),
            BlockElement::StartEnd(block) => block.end_node(),
        }
    }

    pub fn text_content(&self, doc: &BaseDocument) -> String {
        match self {
            BlockElement::Node(block) => block.text_content(doc),
            BlockElement::StartEnd(block) => block.text_content(doc),
        }
    }

    /// Turn the block into a single element, restructuring the tree if needed
    pub fn collapse_to_single_element(&self, doc: &mut BaseDocument) -> Result<usize, ContentError> {
        match self {
            BlockElement::Node(block) => Ok(block.node()),
            BlockElement::StartEnd(block) => block.collapse_to_single_element(doc),
        }
    }

    /// Whether both blocks span the same nodes, whatever their kind
    pub fn equals(&self, other: &BlockElement) -> bool {
        self.start_node() == other.start_node() && self.end_node() == other.end_node()
    }

    /// Whether this block starts after `other` ends
    pub fn is_after(&self, doc: &BaseDocument, other: &BlockElement) -> bool {
        doc.is_node_after(self.start_node(), other.end_node())
    }

    pub fn contains(&self, doc: &BaseDocument, node: usize) -> bool {
        match self {
            BlockElement::Node(block) => block.contains(doc, node),
            BlockElement::StartEnd(block) => block.contains(doc, node),
        }
    }

    /// The first leaf inside the block
    pub fn first_leaf(&self, doc: &BaseDocument) -> usize {
        let start = self.start_node();
        doc.get_first_leaf_node(start).unwrap_or(start)
    }

    /// The last leaf inside the block
    pub fn last_leaf(&self, doc: &BaseDocument) -> usize {
        let end = self.end_node();
        doc.get_last_leaf_node(end).unwrap_or(end)
    }
}

impl From<NodeBlockElement> for BlockElement {
    fn from(block: NodeBlockElement) -> Self {
        BlockElement::Node(block)
    }
}

impl From<StartEndBlockElement> for BlockElement {
    fn from(block: StartEndBlockElement) -> Self {
        BlockElement::StartEnd(block)
    }
}

/// The block containing `node`, without looking outside of `root`.
///
/// Returns `None` when `node` is not `root` or one of its descendants.
pub fn get_block_element_at_node(
    doc: &BaseDocument,
    root: usize,
    node: usize,
) -> Option<BlockElement> {
    if !doc.contains(root, node, true) {
        return None;
    }

    // The closest block serves as the ceiling for the head/tail search.
    // It may be the root itself.
    let mut container = node;
    while container != root && !doc.is_block_element(container) {
        container = doc.get_node(container)?.parent?;
    }

    if container == node {
        return Some(NodeBlockElement::new(node).into());
    }

    // An inline container may hold a line break, which ends the block. Search the tail from
    // its first descendant so the block does not run past that break.
    let tree = doc.tree();
    let mut tail_from = node;
    while let Some(&child) = tree[tail_from].children.first() {
        if doc.is_block_element(child) {
            break;
        }
        tail_from = child;
    }

    let head = find_head_tail_leaf_node(doc, node, container, false);
    let tail = find_head_tail_leaf_node(doc, tail_from, container, true);

    // Collapse as far as possible towards the common ancestor
    let nodes = find_collapsed_nodes(doc, root, head, tail);
    let (Some(&head), Some(&tail)) = (nodes.first(), nodes.last()) else {
        return Some(StartEndBlockElement::new(root, head, tail).into());
    };

    if tree[head].parent != tree[tail].parent {
        return Some(StartEndBlockElement::new(root, head, tail).into());
    }

    let (mut head, mut tail) = (head, tail);
    while tree[head].previous_sibling().is_none() && tree[tail].next_sibling().is_none() {
        let Some(parent) = tree[head].parent else {
            break;
        };
        if parent == container {
            if container != root {
                head = parent;
                tail = parent;
            }
            break;
        } else if parent != root {
            head = parent;
            tail = parent;
        } else {
            break;
        }
    }

    if head == tail && doc.is_block_element(head) {
        Some(NodeBlockElement::new(head).into())
    } else {
        Some(StartEndBlockElement::new(root, head, tail).into())
    }
}

/// Walk outwards from `node` towards the edge of its block, stopping at block elements,
/// line breaks and the container.
///
/// A `<br>` ends a block, so it is the last node of the tail but never part of the head.
fn find_head_tail_leaf_node(doc: &BaseDocument, node: usize, container: usize, is_tail: bool) -> usize {
    let tree = doc.tree();
    let sibling_of = |id: usize| {
        if is_tail {
            tree[id].next_sibling().map(|n| n.id)
        } else {
            tree[id].previous_sibling().map(|n| n.id)
        }
    };
    let child_of = |id: usize| {
        if is_tail {
            tree[id].children.first().copied()
        } else {
            tree[id].children.last().copied()
        }
    };

    let mut result = node;
    if is_tail && tree[node].is_line_break() {
        return result;
    }

    let mut node = node;
    loop {
        let mut sibling = sibling_of(node);
        while sibling.is_none() {
            match tree[node].parent {
                Some(parent) if parent != container => {
                    node = parent;
                    sibling = sibling_of(node);
                }
                _ => return result,
            }
        }

        while let Some(current) = sibling {
            if doc.is_block_element(current) {
                return result;
            }
            if tree[current].is_line_break() {
                return if is_tail { current } else { result };
            }
            node = current;
            sibling = child_of(current);
        }

        result = node;
    }
}

/// The block at the first leaf under `root`
pub fn get_first_block_element(doc: &BaseDocument, root: usize) -> Option<BlockElement> {
    let leaf = doc.get_first_leaf_node(root)?;
    get_block_element_at_node(doc, root, leaf)
}

/// The block at the last leaf under `root`
pub fn get_last_block_element(doc: &BaseDocument, root: usize) -> Option<BlockElement> {
    let leaf = doc.get_last_leaf_node(root)?;
    get_block_element_at_node(doc, root, leaf)
}

/// The block after (or before) `current`, without leaving `root`
pub fn get_next_previous_block_element(
    doc: &BaseDocument,
    root: usize,
    current: &BlockElement,
    is_next: bool,
) -> Option<BlockElement> {
    let from = if is_next {
        current.end_node()
    } else {
        current.start_node()
    };
    let leaf = doc.get_leaf_sibling(root, from, is_next, &[])?;
    get_block_element_at_node(doc, root, leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::DocumentConfig;
    use trellis_html::HtmlDocument;

    fn parse(html: &str) -> (BaseDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default()).into_inner();
        let root = doc.get_element_by_id("root").unwrap();
        (doc, root)
    }

    fn start_end(doc: &BaseDocument, block: Option<BlockElement>) -> (String, String) {
        let block = block.unwrap();
        let describe = |id: usize| {
            let node = doc.get_node(id).unwrap();
            if node.is_text_node() {
                node.text_content()
            } else {
                node.tag_name()
            }
        };
        (describe(block.start_node()), describe(block.end_node()))
    }

    #[test]
    fn node_outside_root_has_no_block() {
        let (doc, root) = parse(r#"<div id="root">a</div><div>b</div>"#);
        let body = doc.body().unwrap().id;
        let b = doc.find_text_node(body, "b").unwrap();
        assert_eq!(get_block_element_at_node(&doc, root, b), None);
    }

    #[test]
    fn block_element_is_its_own_block() {
        let (doc, root) = parse(r#"<div id="root"><p>a</p></div>"#);
        let p = doc.get_node(root).unwrap().children[0];
        assert_eq!(
            get_block_element_at_node(&doc, root, p),
            Some(BlockElement::Node(NodeBlockElement::new(p)))
        );
        assert_eq!(
            get_block_element_at_node(&doc, root, root),
            Some(BlockElement::Node(NodeBlockElement::new(root)))
        );
    }

    #[test]
    fn inline_run_collapses_into_paragraph() {
        let (doc, root) = parse(r#"<div id="root"><p>a<b>b</b></p></div>"#);
        let p = doc.get_node(root).unwrap().children[0];
        let b = doc.find_text_node(root, "b").unwrap();
        assert_eq!(
            get_block_element_at_node(&doc, root, b),
            Some(BlockElement::Node(NodeBlockElement::new(p)))
        );
    }

    #[test]
    fn blocks_stop_at_nested_blocks() {
        let (doc, root) = parse(r#"<div id="root">a<b>b</b><p>c</p>d</div>"#);
        let a = doc.find_text_node(root, "a").unwrap();
        let d = doc.find_text_node(root, "d").unwrap();
        assert_eq!(
            start_end(&doc, get_block_element_at_node(&doc, root, a)),
            ("a".to_string(), "B".to_string())
        );
        assert_eq!(
            start_end(&doc, get_block_element_at_node(&doc, root, d)),
            ("d".to_string(), "d".to_string())
        );
    }

    #[test]
    fn inline_container_stops_at_inner_line_break() {
        let (doc, root) = parse(r#"<div id="root">abc<span>123<br>456</span></div>"#);
        let abc = doc.find_text_node(root, "abc").unwrap();
        let span = doc.get_node(root).unwrap().children[1];

        let from_span = get_block_element_at_node(&doc, root, span).unwrap();
        let from_text = get_block_element_at_node(&doc, root, abc).unwrap();
        assert!(from_span.equals(&from_text));
        assert!(from_span.contains(&doc, span));
        assert_eq!(
            start_end(&doc, Some(from_span)),
            ("abc".to_string(), "BR".to_string())
        );
    }

    #[test]
    fn iterates_blocks_in_order() {
        let (doc, root) = parse(r#"<div id="root">a<br>b<p>c</p>d</div>"#);
        let mut texts = Vec::new();
        let mut block = get_first_block_element(&doc, root);
        while let Some(current) = block {
            texts.push(current.text_content(&doc));
            block = get_next_previous_block_element(&doc, root, &current, true);
        }
        assert_eq!(texts, vec!["a", "b", "c", "d"]);

        let last = get_last_block_element(&doc, root).unwrap();
        assert_eq!(last.text_content(&doc), "d");
        let previous = get_next_previous_block_element(&doc, root, &last, false).unwrap();
        assert_eq!(previous.text_content(&doc), "c");
        assert!(last.is_after(&doc, &previous));
        assert!(!previous.is_after(&doc, &last));
    }
}
