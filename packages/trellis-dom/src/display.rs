//! Block-level classification of nodes.
//!
//! Classification only looks at the tag name and the inline `style` attribute. There is no
//! cascade: a stylesheet rule making a `<span>` a block is not seen here.

use crate::{BaseDocument, Node};

/// Tag names (lowercase) of elements which always start a new block
pub const BLOCK_ELEMENT_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tfoot",
    "ul",
    "video",
];

/// Values of the `display` property which make an element block-level
pub const BLOCK_DISPLAY_STYLES: &[&str] = &["block", "list-item", "table-cell"];

impl Node {
    /// Whether the node is an element which is block-level by tag name or by its inline `display` style
    pub fn is_block_element(&self) -> bool {
        let Some(element) = self.element_data() else {
            return false;
        };

        if BLOCK_ELEMENT_TAGS
            .iter()
            .any(|tag| (*element.name.local).eq_ignore_ascii_case(tag))
        {
            return true;
        }

        element.style_property("display").is_some_and(|display| {
            BLOCK_DISPLAY_STYLES
                .iter()
                .any(|style| display.eq_ignore_ascii_case(style))
        })
    }

    pub fn is_line_break(&self) -> bool {
        self.is_tag("br")
    }
}

impl BaseDocument {
    /// Whether the node is a block element, taking the document's extra block tags into account
    pub fn is_block_element(&self, node_id: usize) -> bool {
        let Some(node) = self.get_node(node_id) else {
            return false;
        };
        node.is_block_element()
            || node.element_data().is_some_and(|element| {
                self.extra_block_tags
                    .iter()
                    .any(|tag| (*element.name.local).eq_ignore_ascii_case(tag))
            })
    }

    /// Uppercase tag name of the node, or an empty string if it is not an element
    pub fn get_tag_of_node(&self, node_id: usize) -> String {
        self.get_node(node_id)
            .map(Node::tag_name)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::{BaseDocument, DocumentConfig, QualName, ns};

    fn element(doc: &mut BaseDocument, tag: &str, style: Option<&str>) -> usize {
        let mut mutator = doc.mutate();
        let id = mutator.create_html_element(tag);
        if let Some(style) = style {
            mutator.set_attribute(id, QualName::new(None, ns!(), "style".into()), style);
        }
        id
    }

    #[test]
    fn block_classification() {
        let mut doc = BaseDocument::new(DocumentConfig {
            extra_block_tags: Some(vec!["X-CARD".to_string()]),
            ..Default::default()
        });
        let p = element(&mut doc, "P", None);
        let span = element(&mut doc, "span", None);
        let styled = element(&mut doc, "span", Some("display: list-item"));
        let inline_div = element(&mut doc, "div", Some("display: inline"));
        let card = element(&mut doc, "x-card", None);
        let text = doc.create_text_node("text");

        assert!(doc.is_block_element(p));
        assert!(!doc.is_block_element(span));
        assert!(doc.is_block_element(styled));
        assert!(doc.is_block_element(inline_div));
        assert!(doc.is_block_element(card));
        assert!(!doc.get_node(card).unwrap().is_block_element());
        assert!(!doc.is_block_element(text));
        assert_eq!(doc.get_tag_of_node(p), "P");
        assert_eq!(doc.get_tag_of_node(text), "");
    }
}
