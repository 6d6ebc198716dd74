use trellis_dom::BaseDocument;

use crate::block::{BlockElement, get_next_previous_block_element};
use crate::inline::{InlineElement, get_next_previous_inline_element};
use crate::scoper::Scoper;

/// Walks blocks and inlines of a document, one step at a time, without leaving the region of
/// its [`Scoper`].
pub struct ContentTraverser<'a, S: Scoper> {
    doc: &'a BaseDocument,
    root: usize,
    scoper: S,
    current_block: Option<BlockElement>,
    current_inline: Option<InlineElement>,
}

impl<'a, S: Scoper> ContentTraverser<'a, S> {
    pub fn new(doc: &'a BaseDocument, root: usize, scoper: S) -> Self {
        let current_block = scoper.start_block_element(doc);
        let current_inline = scoper
            .start_inline_element(doc)
            .and_then(|inline| scoper.trim_inline_element(doc, inline));
        Self {
            doc,
            root,
            scoper,
            current_block,
            current_inline,
        }
    }

    pub fn scoper(&self) -> &S {
        &self.scoper
    }

    pub fn current_block_element(&self) -> Option<BlockElement> {
        self.current_block
    }

    pub fn next_block_element(&mut self) -> Option<BlockElement> {
        self.move_block(true)
    }

    pub fn previous_block_element(&mut self) -> Option<BlockElement> {
        self.move_block(false)
    }

    pub fn current_inline_element(&self) -> Option<InlineElement> {
        self.current_inline
    }

    pub fn next_inline_element(&mut self) -> Option<InlineElement> {
        self.move_inline(true)
    }

    pub fn previous_inline_element(&mut self) -> Option<InlineElement> {
        self.move_inline(false)
    }

    /// Step to the adjacent block if it is in scope. The current block is kept otherwise.
    fn move_block(&mut self, is_next: bool) -> Option<BlockElement> {
        let current = self.current_block?;
        let block = get_next_previous_block_element(self.doc, self.root, &current, is_next)
            .filter(|block| self.scoper.is_block_in_scope(self.doc, block))?;
        self.current_block = Some(block);
        Some(block)
    }

    /// Step to the adjacent inline, trimmed to the scope. The current inline is kept if there is
    /// none.
    fn move_inline(&mut self, is_next: bool) -> Option<InlineElement> {
        let current = self.current_inline?;
        let doc = self.doc;

        let mut candidate = get_next_previous_inline_element(doc, self.root, &current, is_next);
        // An empty inline has no extent, so its neighbour may overlap it. Skip anything that does
        // not move in the requested direction.
        while let Some(inline) = candidate {
            let moved = if is_next {
                inline.is_after(doc, &current)
            } else {
                current.is_after(doc, &inline)
            };
            if moved {
                break;
            }
            candidate = get_next_previous_inline_element(doc, self.root, &inline, is_next);
        }

        let inline = self.scoper.trim_inline_element(doc, candidate?)?;
        self.current_inline = Some(inline);
        Some(inline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoper::{BodyScoper, SelectionBlockScoper, StartFrom};
    use trellis_dom::{DocumentConfig, Position};
    use trellis_html::HtmlDocument;

    fn parse(html: &str) -> (BaseDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default()).into_inner();
        let root = doc.get_element_by_id("root").unwrap();
        (doc, root)
    }

    #[test]
    fn walks_blocks_of_body() {
        let (doc, root) = parse(r#"<div id="root"><p>a</p>b<br>c<p>d</p></div>"#);
        let mut traverser = ContentTraverser::new(&doc, root, BodyScoper::new(&doc, root));

        let mut texts = vec![traverser.current_block_element().unwrap().text_content(&doc)];
        while let Some(block) = traverser.next_block_element() {
            texts.push(block.text_content(&doc));
        }
        assert_eq!(texts, vec!["a", "b", "c", "d"]);

        // Stays on the last block
        assert_eq!(traverser.current_block_element().unwrap().text_content(&doc), "d");
        assert_eq!(traverser.previous_block_element().unwrap().text_content(&doc), "c");
    }

    #[test]
    fn selection_scope_stays_in_block() {
        let (doc, root) = parse(r#"<div id="root"><p>ab<b>cd</b>ef</p><p>gh</p></div>"#);
        let cd = doc.find_text_node(root, "cd").unwrap();
        let scoper =
            SelectionBlockScoper::new(&doc, root, Position::new(&doc, cd, 1), StartFrom::Begin);
        let mut traverser = ContentTraverser::new(&doc, root, scoper);

        assert_eq!(traverser.next_block_element(), None);
        assert_eq!(traverser.previous_block_element(), None);

        let mut texts = vec![traverser.current_inline_element().unwrap().text_content(&doc)];
        while let Some(inline) = traverser.next_inline_element() {
            texts.push(inline.text_content(&doc));
        }
        assert_eq!(texts, vec!["ab", "cd", "ef"]);
        assert_eq!(traverser.current_inline_element().unwrap().text_content(&doc), "ef");
    }

    #[test]
    fn walks_back_from_selection() {
        let (doc, root) = parse(r#"<div id="root"><p>ab<b>cd</b></p></div>"#);
        let cd = doc.find_text_node(root, "cd").unwrap();
        let scoper = SelectionBlockScoper::new(
            &doc,
            root,
            Position::new(&doc, cd, 1),
            StartFrom::SelectionStart,
        );
        let mut traverser = ContentTraverser::new(&doc, root, scoper);

        assert_eq!(traverser.current_inline_element().unwrap().text_content(&doc), "c");
        assert_eq!(traverser.previous_inline_element().unwrap().text_content(&doc), "ab");
        assert_eq!(traverser.previous_inline_element(), None);
        assert_eq!(traverser.next_inline_element().unwrap().text_content(&doc), "cd");
    }
}
