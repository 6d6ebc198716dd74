use trellis_dom::{BaseDocument, SelectionRange};

use crate::ContentError;
use crate::collapse::{collapse_nodes, split_balanced_node_range, wrap};

/// A block bounded by a start node and an end node (inclusive) which share no dedicated wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartEndBlockElement {
    root: usize,
    start: usize,
    end: usize,
}

impl StartEndBlockElement {
    pub fn new(root: usize, start: usize, end: usize) -> Self {
        Self { root, start, end }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn start_node(&self) -> usize {
        self.start
    }

    pub fn end_node(&self) -> usize {
        self.end
    }

    /// The text from before the start node to after the end node
    pub fn text_content(&self, doc: &BaseDocument) -> String {
        SelectionRange::from_nodes(doc, self.start, self.end).text(doc)
    }

    /// Within the start or end subtree, or strictly between them in document order
    pub fn contains(&self, doc: &BaseDocument, node: usize) -> bool {
        doc.contains(self.start, node, true)
            || doc.contains(self.end, node, true)
            || (doc.is_node_after(node, self.start) && doc.is_node_after(self.end, node))
    }

    /// The closest block element among the node and its ancestors, or the root
    fn block_context(&self, doc: &BaseDocument, node: usize) -> usize {
        let mut context = node;
        while context != self.root && !doc.is_block_element(context) {
            match doc.get_node(context).and_then(|n| n.parent) {
                Some(parent) => context = parent,
                None => break,
            }
        }
        context
    }

    /// Restructure the tree so that the block is exactly one element, and return it.
    ///
    /// Inline ancestors shared by the start and end are split around the block. If the
    /// result is not a single block element, it is wrapped in a new element.
    pub fn collapse_to_single_element(&self, doc: &mut BaseDocument) -> Result<usize, ContentError> {
        let context = self.block_context(doc, self.start);
        let mut nodes = collapse_nodes(doc, context, self.start, self.end, true);
        if nodes.is_empty() {
            return Err(ContentError::NotInRoot {
                root: context,
                node: self.start,
            });
        }

        loop {
            let first = nodes[0];
            if first == context {
                break;
            }
            let Some(parent) = doc.get_node(first).and_then(|n| n.parent) else {
                return Err(ContentError::Detached(first));
            };
            if parent == self.root || doc.is_block_element(parent) {
                break;
            }
            match split_balanced_node_range(doc, &nodes)? {
                Some(middle) => nodes = vec![middle],
                None => break,
            }
        }

        match nodes.as_slice() {
            [single] if doc.is_block_element(*single) => Ok(*single),
            _ => {
                let tag = doc.wrapper_tag().to_string();
                wrap(doc, &nodes, &tag)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockElement, get_block_element_at_node};
    use pretty_assertions::assert_eq;
    use trellis_dom::DocumentConfig;
    use trellis_html::HtmlDocument;

    fn parse(html: &str, config: DocumentConfig) -> (BaseDocument, usize) {
        let doc = HtmlDocument::from_html(html, config).into_inner();
        let root = doc.get_element_by_id("root").unwrap();
        (doc, root)
    }

    #[test]
    fn wraps_inline_run() {
        let (mut doc, root) = parse(
            r#"<div id="root">a<b>b</b><br>c</div>"#,
            DocumentConfig::default(),
        );
        let a = doc.find_text_node(root, "a").unwrap();
        let Some(BlockElement::StartEnd(block)) = get_block_element_at_node(&doc, root, a) else {
            panic!("expected a start/end block");
        };

        let element = block.collapse_to_single_element(&mut doc).unwrap();
        assert!(doc.get_node(element).unwrap().flags.is_structural());
        assert_eq!(
            doc.get_node(root).unwrap().inner_html(),
            "<div>a<b>b</b><br></div>c"
        );
    }

    #[test]
    fn splits_shared_inline_ancestor() {
        let (mut doc, root) = parse(
            r#"<div id="root"><span>a<br>b</span></div>"#,
            DocumentConfig {
                wrapper_tag: Some("P".to_string()),
                ..Default::default()
            },
        );
        let a = doc.find_text_node(root, "a").unwrap();
        let block = get_block_element_at_node(&doc, root, a).unwrap();
        let text = block.text_content(&doc);

        let element = block.collapse_to_single_element(&mut doc).unwrap();
        assert_eq!(
            doc.get_node(root).unwrap().inner_html(),
            "<p><span>a<br></span></p><span>b</span>"
        );
        assert_eq!(doc.get_node(element).unwrap().text_content(), text);
    }

    #[test]
    fn contains_nodes_between_ends() {
        let (doc, root) = parse(
            r#"<div id="root">a<i>b</i>c<br>d</div>"#,
            DocumentConfig::default(),
        );
        let a = doc.find_text_node(root, "a").unwrap();
        let b = doc.find_text_node(root, "b").unwrap();
        let c = doc.find_text_node(root, "c").unwrap();
        let d = doc.find_text_node(root, "d").unwrap();
        let block = get_block_element_at_node(&doc, root, a).unwrap();

        assert!(block.contains(&doc, a));
        assert!(block.contains(&doc, b));
        assert!(block.contains(&doc, c));
        assert!(!block.contains(&doc, d));
        assert!(!block.contains(&doc, root));
        assert_eq!(block.text_content(&doc), "abc");
    }
}
