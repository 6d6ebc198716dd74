//! Tree sink feeding html5ever (and xml5ever) output into a [`BaseDocument`].
//!
//! Editable content usually arrives as a fragment, the inner HTML of an editor root, so the
//! sink can either build a whole document or parse a fragment and move the result under an
//! existing node.

use std::borrow::Cow;
use std::cell::{Ref, RefCell, RefMut};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink};
use html5ever::{ParseOpts, QualName};
use trellis_dom::node::Attribute;
use trellis_dom::{BaseDocument, DocumentMutator, NodeData, local_name, ns};

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            drop_doctype: true,
            quirks_mode: QuirksMode::NoQuirks,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn is_xhtml(html: &str) -> bool {
    html.starts_with("<?xml")
        || html.starts_with("<!DOCTYPE") && {
            let first_line = html.lines().next().unwrap_or_default();
            first_line.contains("XHTML") || first_line.contains("xhtml")
        }
}

/// Parse a whole HTML (or XHTML) document into `doc`, below its document node
pub fn parse_document(doc: &mut BaseDocument, html: &str) {
    let sink = HtmlSink::new(doc, 0);
    if is_xhtml(html) {
        xml5ever::driver::parse_document(sink, Default::default()).one(html);
    } else {
        html5ever::parse_document(sink, parse_opts()).one(html);
    }
}

/// Parse `html` as the content of `parent` and append the resulting nodes to it.
///
/// The fragment is parsed in the context of `parent`'s tag (`<div>` if it is not an element),
/// so e.g. `<li>` content for a `<ul>` is not moved around by the tree builder. Returns the ids
/// of the appended top-level nodes.
pub fn append_html(doc: &mut BaseDocument, parent: usize, html: &str) -> Vec<usize> {
    let context_name = doc
        .get_node(parent)
        .and_then(|node| node.element_data())
        .map(|element| element.name.clone())
        .unwrap_or_else(|| QualName::new(None, ns!(html), local_name!("div")));

    // The tree builder appends an <html> element to the node it sees as the document.
    // Parse into a detached scratch node and move the content over afterwards.
    let scratch = doc.create_node(NodeData::Document);
    let context = doc.mutate().create_element(context_name, Vec::new());

    let sink = HtmlSink::new(doc, scratch);
    html5ever::driver::parse_fragment_for_element(sink, parse_opts(), context, false, None)
        .one(html);

    let mut mutator = doc.mutate();
    let content: Vec<usize> = match mutator.last_child_id(scratch) {
        Some(html_element) => mutator
            .doc
            .get_node(html_element)
            .map(|node| node.children.clone())
            .unwrap_or_default(),
        None => Vec::new(),
    };
    mutator.append_children(parent, &content);
    mutator.remove_node_if_unparented(scratch);
    mutator.remove_node_if_unparented(context);
    content
}

pub struct HtmlSink<'doc> {
    mutator: RefCell<DocumentMutator<'doc>>,

    /// The node the tree builder treats as the document
    document: usize,

    /// Errors reported by the tree builder
    errors: RefCell<Vec<Cow<'static, str>>>,
}

impl<'doc> HtmlSink<'doc> {
    pub fn new(doc: &'doc mut BaseDocument, document: usize) -> Self {
        HtmlSink {
            mutator: RefCell::new(doc.mutate()),
            document,
            errors: RefCell::new(Vec::new()),
        }
    }

    #[track_caller]
    fn mutr(&self) -> RefMut<'_, DocumentMutator<'doc>> {
        self.mutator.borrow_mut()
    }

    /// Insert text before `before` (or at the end of `parent`), merging it into an adjacent
    /// text node when there is one
    fn insert_text(&self, parent: usize, before: Option<usize>, text: &str) {
        let mut mutator = self.mutr();
        let neighbour = match before {
            Some(sibling) => mutator.previous_sibling_id(sibling),
            None => mutator.last_child_id(parent),
        };
        if neighbour.is_some_and(|id| mutator.append_text_to_node(id, text).is_ok()) {
            return;
        }

        let text_node = mutator.create_text_node(text);
        match before {
            Some(sibling) => mutator.insert_nodes_before(sibling, &[text_node]),
            None => mutator.append_children(parent, &[text_node]),
        }
    }
}

fn to_attributes(attrs: Vec<html5ever::Attribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|attr| Attribute {
            name: attr.name,
            value: attr.value.to_string(),
        })
        .collect()
}

impl TreeSink for HtmlSink<'_> {
    type Output = ();

    type Handle = usize;

    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        drop(self.mutator.into_inner());

        #[cfg(feature = "tracing")]
        for error in self.errors.borrow().iter() {
            tracing::warn!(document = self.document, "html parse error: {error}");
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.mutator.borrow(), |mutator| {
            mutator
                .element_name(*target)
                .expect("tree builder asked for the name of a non-element")
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        self.mutr().create_element(name, to_attributes(attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.mutr().create_comment_node()
    }

    // Processing instructions carry nothing editable
    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.mutr().create_comment_node()
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(id) => self.mutr().append_children(*parent, &[id]),
            NodeOrText::AppendText(text) => self.insert_text(*parent, None, &text),
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(id) => self.mutr().insert_nodes_before(*sibling, &[id]),
            NodeOrText::AppendText(text) => {
                let Some(parent) = self.mutr().parent_id(*sibling) else {
                    return;
                };
                self.insert_text(parent, Some(*sibling), &text);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.mutr().node_has_parent(*element) {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {}

    // Template contents are kept inline as ordinary children
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        self.mutr().add_attrs_if_missing(*target, to_attributes(attrs));
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.mutr().remove_node(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        self.mutr().reparent_children(*node, *new_parent);
    }
}
