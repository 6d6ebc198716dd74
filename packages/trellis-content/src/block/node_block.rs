use trellis_dom::BaseDocument;

/// A block made up of exactly one node (and its subtree), e.g. a `<p>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBlockElement {
    node: usize,
}

impl NodeBlockElement {
    pub fn new(node: usize) -> Self {
        Self { node }
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn text_content(&self, doc: &BaseDocument) -> String {
        doc.get_node(self.node)
            .map(|node| node.text_content())
            .unwrap_or_default()
    }

    pub fn contains(&self, doc: &BaseDocument, node: usize) -> bool {
        doc.contains(self.node, node, true)
    }
}
