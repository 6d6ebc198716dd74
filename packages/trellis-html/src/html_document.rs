use std::ops::{Deref, DerefMut};

use crate::html_sink::{append_html, parse_document};

use trellis_dom::{BaseDocument, DocumentConfig};

pub struct HtmlDocument {
    inner: BaseDocument,

    /// The element holding the content, for documents built from a fragment
    root: Option<usize>,
}

impl Deref for HtmlDocument {
    type Target = BaseDocument;
    fn deref(&self) -> &BaseDocument {
        &self.inner
    }
}
impl DerefMut for HtmlDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
impl From<HtmlDocument> for BaseDocument {
    fn from(doc: HtmlDocument) -> BaseDocument {
        doc.inner
    }
}

impl HtmlDocument {
    /// Parse HTML (or XHTML) into an [`HtmlDocument`]
    pub fn from_html(html: &str, config: DocumentConfig) -> Self {
        let mut doc = BaseDocument::new(config);
        parse_document(&mut doc, html);
        HtmlDocument {
            inner: doc,
            root: None,
        }
    }

    /// Parse editable content into a fresh `<div>` root directly below the document node
    pub fn from_fragment(html: &str, config: DocumentConfig) -> Self {
        let mut doc = BaseDocument::new(config);
        let root = {
            let mut mutator = doc.mutate();
            let root = mutator.create_html_element("div");
            mutator.append_children(0, &[root]);
            root
        };
        append_html(&mut doc, root, html);
        HtmlDocument {
            inner: doc,
            root: Some(root),
        }
    }

    /// The content root of a document built with [`HtmlDocument::from_fragment`]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Convert the [`HtmlDocument`] into it's inner [`BaseDocument`]
    pub fn into_inner(self) -> BaseDocument {
        self.into()
    }
}
