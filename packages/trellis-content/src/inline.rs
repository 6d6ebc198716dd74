//! Inline elements: contiguous runs of inline content inside a block.
//!
//! An inline is a whole node (a text node, a link, an image or any other leaf-level node), a part
//! of one cut by positions, or an empty placeholder at a position.

use trellis_dom::{BaseDocument, Position, PositionType, SelectionRange};

use crate::block::{BlockElement, get_block_element_at_node};

/// What a [`NodeInlineElement`] represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Text,
    /// An `<a>` element and everything inside it
    Link,
    /// An `<img>` element
    Image,
    /// Any other node, such as a `<br>` or an empty `<span>`
    Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInlineElement {
    node: usize,
    kind: InlineKind,
    parent_block: BlockElement,
}

impl NodeInlineElement {
    pub fn new(node: usize, kind: InlineKind, parent_block: BlockElement) -> Self {
        Self {
            node,
            kind,
            parent_block,
        }
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn kind(&self) -> InlineKind {
        self.kind
    }

    pub fn parent_block(&self) -> BlockElement {
        self.parent_block
    }

    pub fn start_position(&self, doc: &BaseDocument) -> Position {
        Position::at(doc, self.node, PositionType::Begin)
    }

    pub fn end_position(&self, doc: &BaseDocument) -> Position {
        Position::at(doc, self.node, PositionType::End)
    }
}

/// Part of a node inline, cut at an optional start and an optional end position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialInlineElement {
    inline: NodeInlineElement,
    start: Option<Position>,
    end: Option<Position>,
}

impl PartialInlineElement {
    pub fn new(inline: NodeInlineElement, start: Option<Position>, end: Option<Position>) -> Self {
        Self { inline, start, end }
    }

    /// The whole inline this is a part of
    pub fn decorated_inline(&self) -> NodeInlineElement {
        self.inline
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    /// The remaining part of the inline after this one, if this part has an end
    pub fn next_inline_element(&self) -> Option<PartialInlineElement> {
        self.end
            .map(|end| PartialInlineElement::new(self.inline, Some(end), None))
    }

    /// The remaining part of the inline before this one, if this part has a start
    pub fn previous_inline_element(&self) -> Option<PartialInlineElement> {
        self.start
            .map(|start| PartialInlineElement::new(self.inline, None, Some(start)))
    }
}

/// A zero-width inline at a position. Has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyInlineElement {
    position: Position,
    parent_block: BlockElement,
}

impl EmptyInlineElement {
    pub fn new(position: Position, parent_block: BlockElement) -> Self {
        Self {
            position,
            parent_block,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineElement {
    Node(NodeInlineElement),
    Partial(PartialInlineElement),
    Empty(EmptyInlineElement),
}

impl InlineElement {
    pub fn container_node(&self) -> usize {
        match self {
            InlineElement::Node(inline) => inline.node,
            InlineElement::Partial(partial) => partial.inline.node,
            InlineElement::Empty(empty) => empty.position.node,
        }
    }

    pub fn parent_block(&self) -> BlockElement {
        match self {
            InlineElement::Node(inline) => inline.parent_block,
            InlineElement::Partial(partial) => partial.inline.parent_block,
            InlineElement::Empty(empty) => empty.parent_block,
        }
    }

    /// The kind of the underlying node, `None` for an empty inline
    pub fn kind(&self) -> Option<InlineKind> {
        match self {
            InlineElement::Node(inline) => Some(inline.kind),
            InlineElement::Partial(partial) => Some(partial.inline.kind),
            InlineElement::Empty(_) => None,
        }
    }

    pub fn start_position(&self, doc: &BaseDocument) -> Position {
        match self {
            InlineElement::Node(inline) => inline.start_position(doc),
            InlineElement::Partial(partial) => partial
                .start
                .unwrap_or_else(|| partial.inline.start_position(doc)),
            InlineElement::Empty(empty) => empty.position,
        }
    }

    pub fn end_position(&self, doc: &BaseDocument) -> Position {
        match self {
            InlineElement::Node(inline) => inline.end_position(doc),
            InlineElement::Partial(partial) => partial
                .end
                .unwrap_or_else(|| partial.inline.end_position(doc)),
            InlineElement::Empty(empty) => empty.position,
        }
    }

    pub fn text_content(&self, doc: &BaseDocument) -> String {
        match self {
            InlineElement::Node(inline) => doc
                .get_node(inline.node)
                .map(|node| node.text_content())
                .unwrap_or_default(),
            InlineElement::Partial(_) => {
                SelectionRange::new(doc, self.start_position(doc), self.end_position(doc))
                    .text(doc)
            }
            InlineElement::Empty(_) => String::new(),
        }
    }

    /// Whether this inline starts at or after the end of `other`
    pub fn is_after(&self, doc: &BaseDocument, other: &InlineElement) -> bool {
        let start = self.start_position(doc);
        let other_end = other.end_position(doc);
        start.is_after(doc, &other_end) || start.equal_to(&other_end)
    }

    /// Whether `position` lies strictly inside this inline
    pub fn contains_position(&self, doc: &BaseDocument, position: &Position) -> bool {
        position.is_after(doc, &self.start_position(doc))
            && self.end_position(doc).is_after(doc, position)
    }
}

impl From<NodeInlineElement> for InlineElement {
    fn from(inline: NodeInlineElement) -> Self {
        InlineElement::Node(inline)
    }
}

impl From<PartialInlineElement> for InlineElement {
    fn from(partial: PartialInlineElement) -> Self {
        InlineElement::Partial(partial)
    }
}

impl From<EmptyInlineElement> for InlineElement {
    fn from(empty: EmptyInlineElement) -> Self {
        InlineElement::Empty(empty)
    }
}

/// The inline containing `node`, within the block at `node` under `root`
pub fn get_inline_element_at_node(
    doc: &BaseDocument,
    root: usize,
    node: usize,
) -> Option<InlineElement> {
    let block = get_block_element_at_node(doc, root, node)?;
    Some(resolve_inline_element(doc, node, block).into())
}

/// Find the inline for `node` inside `block`. The outermost link or image wins,
/// then text nodes; anything else is a generic inline.
fn resolve_inline_element(
    doc: &BaseDocument,
    node: usize,
    block: BlockElement,
) -> NodeInlineElement {
    let mut chain = vec![node];
    let mut parent = doc.get_node(node).and_then(|n| n.parent);
    while let Some(id) = parent.filter(|id| block.contains(doc, *id)) {
        chain.push(id);
        parent = doc.get_node(id).and_then(|n| n.parent);
    }

    chain
        .iter()
        .rev()
        .find_map(|&id| {
            let current = doc.get_node(id)?;
            let kind = if current.is_tag("a") {
                InlineKind::Link
            } else if current.is_tag("img") {
                InlineKind::Image
            } else if current.is_text_node() {
                InlineKind::Text
            } else {
                return None;
            };
            Some(NodeInlineElement::new(id, kind, block))
        })
        .unwrap_or_else(|| NodeInlineElement::new(node, InlineKind::Node, block))
}

/// The inline at the first leaf under `root`
pub fn get_first_inline_element(doc: &BaseDocument, root: usize) -> Option<InlineElement> {
    let leaf = doc.get_first_leaf_node(root)?;
    get_inline_element_at_node(doc, root, leaf)
}

/// The inline at the last leaf under `root`
pub fn get_last_inline_element(doc: &BaseDocument, root: usize) -> Option<InlineElement> {
    let leaf = doc.get_last_leaf_node(root)?;
    get_inline_element_at_node(doc, root, leaf)
}

/// The inline immediately before (or after) `position`.
///
/// When the position cuts a text node, the result is the part of that node's inline on the
/// requested side of the position.
pub fn get_inline_element_before_after(
    doc: &BaseDocument,
    root: usize,
    position: &Position,
    is_after: bool,
) -> Option<InlineElement> {
    let position = position.normalize(doc);
    let Position {
        offset, is_at_end, ..
    } = position;

    let mut node = Some(position.node);
    let mut is_partial = false;
    if (!is_after && offset == 0 && !is_at_end) || (is_after && is_at_end) {
        node = doc.get_leaf_sibling(root, position.node, is_after, &[]);
    } else if doc.get_node(position.node)?.is_text_node()
        && ((!is_after && !is_at_end) || (is_after && offset > 0))
    {
        is_partial = true;
    }

    let inline = get_inline_element_at_node(doc, root, node?)?;
    let InlineElement::Node(node_inline) = inline else {
        return Some(inline);
    };

    if is_partial || inline.contains_position(doc, &position) {
        let partial = if is_after {
            PartialInlineElement::new(node_inline, Some(position), None)
        } else {
            PartialInlineElement::new(node_inline, None, Some(position))
        };
        return Some(partial.into());
    }

    Some(inline)
}

/// The inline following (or preceding) `current` under `root`.
///
/// For a partial inline, the rest of the same node comes first.
pub fn get_next_previous_inline_element(
    doc: &BaseDocument,
    root: usize,
    current: &InlineElement,
    is_next: bool,
) -> Option<InlineElement> {
    if let InlineElement::Partial(partial) = current {
        let rest = if is_next {
            partial.next_inline_element()
        } else {
            partial.previous_inline_element()
        };
        if let Some(rest) = rest {
            return Some(rest.into());
        }
    }

    let leaf = doc.get_leaf_sibling(root, current.container_node(), is_next, &[])?;
    get_inline_element_at_node(doc, root, leaf)
}
