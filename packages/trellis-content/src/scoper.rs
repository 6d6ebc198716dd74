//! Scopers restrict block and inline traversal to part of a document.

use trellis_dom::{BaseDocument, Position, SelectionRange};

use crate::block::{BlockElement, get_block_element_at_node, get_first_block_element};
use crate::inline::{
    EmptyInlineElement, InlineElement, get_first_inline_element, get_inline_element_at_node,
    get_inline_element_before_after,
};

/// The region a [`ContentTraverser`](crate::ContentTraverser) is allowed to visit.
///
/// A scoper is built for a single query and must not outlive a structural mutation of the
/// document it was built from.
pub trait Scoper {
    /// The block traversal starts from
    fn start_block_element(&self, doc: &BaseDocument) -> Option<BlockElement>;

    /// The inline traversal starts from
    fn start_inline_element(&self, doc: &BaseDocument) -> Option<InlineElement>;

    fn is_block_in_scope(&self, doc: &BaseDocument, block: &BlockElement) -> bool;

    /// The part of `inline` inside the scope, if any
    fn trim_inline_element(&self, doc: &BaseDocument, inline: InlineElement)
    -> Option<InlineElement>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrRange {
    Position(Position),
    Range(SelectionRange),
}

impl PositionOrRange {
    /// The position itself, or the start of the range
    pub fn start(&self) -> Position {
        match self {
            PositionOrRange::Position(position) => *position,
            PositionOrRange::Range(range) => range.start,
        }
    }
}

impl From<Position> for PositionOrRange {
    fn from(position: Position) -> Self {
        PositionOrRange::Position(position)
    }
}

impl From<SelectionRange> for PositionOrRange {
    fn from(range: SelectionRange) -> Self {
        PositionOrRange::Range(range)
    }
}

/// Where a [`SelectionBlockScoper`] starts its inline traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartFrom {
    /// The first inline of the block
    Begin,
    /// The last inline of the block
    End,
    /// The inline right before the selection
    #[default]
    SelectionStart,
}

/// The stamp of the document state a scoper was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DocumentStamp {
    document_id: usize,
    generation: u64,
}

impl DocumentStamp {
    fn of(doc: &BaseDocument) -> Self {
        Self {
            document_id: doc.id(),
            generation: doc.generation(),
        }
    }

    fn check(&self, doc: &BaseDocument) {
        assert_eq!(
            self.document_id,
            doc.id(),
            "scoper used with a different document than it was built from"
        );
        assert_eq!(
            self.generation,
            doc.generation(),
            "scoper used after the document was mutated (built at generation {}, now {})",
            self.generation,
            doc.generation()
        );
    }
}

/// Scopes traversal to the block containing a position.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBlockScoper {
    root: usize,
    position: Position,
    block: Option<BlockElement>,
    start_from: StartFrom,
    stamp: DocumentStamp,
}

impl SelectionBlockScoper {
    pub fn new(
        doc: &BaseDocument,
        root: usize,
        position: impl Into<PositionOrRange>,
        start_from: StartFrom,
    ) -> Self {
        let position = position.into().start().normalize(doc);
        let block = get_block_element_at_node(doc, root, position.node);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            root,
            node = position.node,
            offset = position.offset,
            ?start_from,
            found_block = block.is_some(),
            "selection block scoper"
        );

        Self {
            root,
            position,
            block,
            start_from,
            stamp: DocumentStamp::of(doc),
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// The normalized position the scoper was built from
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn start_from(&self) -> StartFrom {
        self.start_from
    }
}

impl Scoper for SelectionBlockScoper {
    fn start_block_element(&self, doc: &BaseDocument) -> Option<BlockElement> {
        self.stamp.check(doc);
        self.block
    }

    fn start_inline_element(&self, doc: &BaseDocument) -> Option<InlineElement> {
        self.stamp.check(doc);
        let block = self.block?;

        match self.start_from {
            StartFrom::Begin => get_inline_element_at_node(doc, self.root, block.first_leaf(doc)),
            StartFrom::End => get_inline_element_at_node(doc, self.root, block.last_leaf(doc)),
            StartFrom::SelectionStart => {
                // The inline after the position may belong to the next block at the end of a
                // paragraph, so start from the one before it
                let before = get_inline_element_before_after(doc, self.root, &self.position, false)
                    .filter(|inline| block.contains(doc, inline.container_node()));
                Some(before.unwrap_or_else(|| EmptyInlineElement::new(self.position, block).into()))
            }
        }
    }

    fn is_block_in_scope(&self, doc: &BaseDocument, block: &BlockElement) -> bool {
        self.stamp.check(doc);
        self.block.is_some_and(|own| own.equals(block))
    }

    fn trim_inline_element(
        &self,
        doc: &BaseDocument,
        inline: InlineElement,
    ) -> Option<InlineElement> {
        self.stamp.check(doc);
        let block = self.block?;
        block
            .contains(doc, inline.container_node())
            .then_some(inline)
    }
}

/// Scopes traversal to everything under a root node.
#[derive(Debug, Clone, Copy)]
pub struct BodyScoper {
    root: usize,
    stamp: DocumentStamp,
}

impl BodyScoper {
    pub fn new(doc: &BaseDocument, root: usize) -> Self {
        Self {
            root,
            stamp: DocumentStamp::of(doc),
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }
}

impl Scoper for BodyScoper {
    fn start_block_element(&self, doc: &BaseDocument) -> Option<BlockElement> {
        self.stamp.check(doc);
        get_first_block_element(doc, self.root)
    }

    fn start_inline_element(&self, doc: &BaseDocument) -> Option<InlineElement> {
        self.stamp.check(doc);
        get_first_inline_element(doc, self.root)
    }

    fn is_block_in_scope(&self, doc: &BaseDocument, block: &BlockElement) -> bool {
        self.stamp.check(doc);
        doc.contains(self.root, block.start_node(), true)
            && doc.contains(self.root, block.end_node(), true)
    }

    fn trim_inline_element(
        &self,
        doc: &BaseDocument,
        inline: InlineElement,
    ) -> Option<InlineElement> {
        self.stamp.check(doc);
        doc.contains(self.root, inline.container_node(), true)
            .then_some(inline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::{DocumentConfig, PositionType};
    use trellis_html::HtmlDocument;

    fn parse(html: &str) -> (BaseDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default()).into_inner();
        let root = doc.get_element_by_id("root").unwrap();
        (doc, root)
    }

    #[test]
    fn start_inline_modes() {
        let (doc, root) = parse(r#"<div id="root">ab<i>cd</i>ef<br>gh</div>"#);
        let cd = doc.find_text_node(root, "cd").unwrap();
        let position = Position::new(&doc, cd, 1);

        let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::Begin);
        let inline = scoper.start_inline_element(&doc).unwrap();
        assert_eq!(inline.text_content(&doc), "ab");

        // The last inline of the block is the line break ending it
        let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::End);
        let inline = scoper.start_inline_element(&doc).unwrap();
        assert_eq!(doc.get_node(inline.container_node()).unwrap().tag_name(), "BR");

        let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::SelectionStart);
        let inline = scoper.start_inline_element(&doc).unwrap();
        assert_eq!(inline.text_content(&doc), "c");
    }

    #[test]
    fn begin_and_end_use_the_block_edges() {
        let (doc, root) = parse(r#"<div id="root">ab<br>cd<br>ef</div>"#);
        let cd = doc.find_text_node(root, "cd").unwrap();
        let position = Position::new(&doc, cd, 1);

        let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::Begin);
        let inline = scoper.start_inline_element(&doc).unwrap();
        assert_eq!(inline.text_content(&doc), "cd");
        assert!(scoper.trim_inline_element(&doc, inline).is_some());

        let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::End);
        let inline = scoper.start_inline_element(&doc).unwrap();
        let br = doc.get_node(cd).unwrap().next_sibling().unwrap().id;
        assert_eq!(inline.container_node(), br);
    }

    #[test]
    fn range_uses_its_start() {
        let (doc, root) = parse(r#"<div id="root"><p>ab</p><p>cd</p></div>"#);
        let ab = doc.find_text_node(root, "ab").unwrap();
        let cd = doc.find_text_node(root, "cd").unwrap();
        let range = SelectionRange::new(
            &doc,
            Position::new(&doc, cd, 1),
            Position::new(&doc, ab, 1),
        );

        let scoper = SelectionBlockScoper::new(&doc, root, range, StartFrom::SelectionStart);
        let block = scoper.start_block_element(&doc).unwrap();
        assert_eq!(block.text_content(&doc), "ab");

        let other = get_block_element_at_node(&doc, root, cd).unwrap();
        assert!(scoper.is_block_in_scope(&doc, &block));
        assert!(!scoper.is_block_in_scope(&doc, &other));

        let outside = get_inline_element_at_node(&doc, root, cd).unwrap();
        assert_eq!(scoper.trim_inline_element(&doc, outside), None);
        let inside = get_inline_element_at_node(&doc, root, ab).unwrap();
        assert_eq!(scoper.trim_inline_element(&doc, inside), Some(inside));
    }

    #[test]
    fn body_scoper_covers_root() {
        let (doc, root) = parse(r#"<div id="root"><p>ab</p><p>cd</p></div><p>ef</p>"#);
        let body = doc.body().unwrap().id;
        let ef = doc.find_text_node(body, "ef").unwrap();
        let scoper = BodyScoper::new(&doc, root);

        let first = scoper.start_block_element(&doc).unwrap();
        assert_eq!(first.text_content(&doc), "ab");
        assert!(scoper.is_block_in_scope(&doc, &first));
        assert_eq!(scoper.start_inline_element(&doc).unwrap().text_content(&doc), "ab");

        let outside = get_block_element_at_node(&doc, body, ef).unwrap();
        assert!(!scoper.is_block_in_scope(&doc, &outside));
    }

    #[test]
    #[should_panic(expected = "scoper used after the document was mutated")]
    fn stale_scoper_panics() {
        let (mut doc, root) = parse(r#"<div id="root">ab</div>"#);
        let ab = doc.find_text_node(root, "ab").unwrap();
        let scoper = SelectionBlockScoper::new(
            &doc,
            root,
            Position::at(&doc, ab, PositionType::Begin),
            StartFrom::Begin,
        );
        doc.mutate().set_node_text(ab, "changed");
        scoper.start_block_element(&doc);
    }
}
