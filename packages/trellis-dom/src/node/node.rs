use bitflags::bitflags;
use slab::Slab;
use std::fmt::Write;

use super::{Attribute, ElementData};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NodeFlags: u32 {
        /// The node was created by the editing core itself (a split remainder or a wrapper)
        /// rather than by the document's author
        const IS_STRUCTURAL = 0b00000001;
    }
}

impl NodeFlags {
    #[inline(always)]
    pub fn is_structural(&self) -> bool {
        self.contains(Self::IS_STRUCTURAL)
    }
}

/// Elements which never have children and are serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub struct Node {
    // The actual tree we belong to. This is unsafe!!
    tree: *mut Slab<Node>,

    /// Our Id
    pub id: usize,
    /// Our parent's ID
    pub parent: Option<usize>,
    // What are our children?
    pub children: Vec<usize>,

    // Flags
    pub flags: NodeFlags,

    /// Node type (Element, TextNode, etc) specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(tree: *mut Slab<Node>, id: usize, data: NodeData) -> Self {
        Self {
            tree,
            id,
            parent: None,
            children: vec![],
            flags: NodeFlags::empty(),
            data,
        }
    }
}

/// The different kinds of nodes in the DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The `Document` itself - the root node of a HTML document.
    Document,

    /// An element with attributes.
    Element(ElementData),

    /// A text node.
    Text(TextNodeData),

    /// A comment.
    Comment,
}

impl NodeData {
    pub fn downcast_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(&self.downcast_element()?.attrs)
    }

}

#[derive(Debug, Clone)]
pub struct TextNodeData {
    /// The textual content of the text node
    pub content: String,
}

impl TextNodeData {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}

impl Node {
    pub fn tree(&self) -> &Slab<Node> {
        unsafe { &*self.tree }
    }

    #[track_caller]
    pub fn with(&self, id: usize) -> &Node {
        self.tree().get(id).unwrap()
    }

    pub fn parent_node(&self) -> Option<&Node> {
        self.parent.map(|id| self.with(id))
    }

    // Get the index of the child in the current node's child list
    pub fn index_of_child(&self, child_id: usize) -> Option<usize> {
        self.children.iter().position(|id| *id == child_id)
    }

    // Get the index of the current node in the parents child list
    pub fn child_index(&self) -> Option<usize> {
        self.tree()[self.parent?]
            .children
            .iter()
            .position(|id| *id == self.id)
    }

    // Get the nth node after this one in the parents child list
    pub fn forward(&self, n: usize) -> Option<&Node> {
        let child_idx = self.child_index()?;
        self.tree()[self.parent?]
            .children
            .get(child_idx + n)
            .map(|id| self.with(*id))
    }

    pub fn backward(&self, n: usize) -> Option<&Node> {
        let child_idx = self.child_index()?;
        if child_idx < n {
            return None;
        }

        self.tree()[self.parent?]
            .children
            .get(child_idx - n)
            .map(|id| self.with(*id))
    }

    pub fn next_sibling(&self) -> Option<&Node> {
        self.forward(1)
    }

    pub fn previous_sibling(&self) -> Option<&Node> {
        self.backward(1)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first().map(|id| self.with(*id))
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.children.last().map(|id| self.with(*id))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        match self.data {
            NodeData::Element(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data(&self) -> Option<&TextNodeData> {
        match self.data {
            NodeData::Text(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextNodeData> {
        match self.data {
            NodeData::Text(ref mut data) => Some(data),
            _ => None,
        }
    }

    /// Uppercase tag name of an element node, or an empty string for any other kind of node
    pub fn tag_name(&self) -> String {
        self.element_data()
            .map(ElementData::tag_name)
            .unwrap_or_default()
    }

    /// Whether this is an element whose local name matches `tag` (case-insensitive)
    pub fn is_tag(&self, tag: &str) -> bool {
        self.element_data().is_some_and(|el| el.is_tag(tag))
    }

    /// The largest offset a position inside this node can have:
    /// the byte length for text nodes, the number of children otherwise.
    pub fn end_offset(&self) -> usize {
        match &self.data {
            NodeData::Text(data) => data.content.len(),
            _ => self.children.len(),
        }
    }

    pub fn node_debug_str(&self) -> String {
        let mut s = String::new();

        match &self.data {
            NodeData::Document => write!(s, "DOCUMENT"),
            NodeData::Text(data) => {
                let end = data
                    .content
                    .char_indices()
                    .nth(10)
                    .map(|(idx, _)| idx)
                    .unwrap_or(data.content.len());
                write!(s, "TEXT {}", &data.content[..end])
            }
            NodeData::Comment => write!(s, "COMMENT"),
            NodeData::Element(data) => {
                let name = &data.name;
                let class = data.attrs.get("class").unwrap_or("");
                let structural = if self.flags.is_structural() {
                    " [structural]"
                } else {
                    ""
                };
                if !class.is_empty() {
                    write!(s, "<{} class=\"{}\">{}", name.local, class, structural)
                } else {
                    write!(s, "<{}>{}", name.local, structural)
                }
            }
        }
        .unwrap();
        s
    }

    pub fn outer_html(&self) -> String {
        let mut output = String::new();
        self.write_outer_html(&mut output);
        output
    }

    pub fn inner_html(&self) -> String {
        let mut output = String::new();
        for &child_id in &self.children {
            self.with(child_id).write_outer_html(&mut output);
        }
        output
    }

    pub fn write_outer_html(&self, writer: &mut String) {
        match &self.data {
            NodeData::Document => {
                for &child_id in &self.children {
                    self.with(child_id).write_outer_html(writer);
                }
            }
            NodeData::Comment => {}
            NodeData::Text(data) => {
                writer.push_str(&html_escape::encode_text(&data.content));
            }
            NodeData::Element(data) => {
                writer.push('<');
                writer.push_str(&data.name.local);

                for attr in data.attrs() {
                    writer.push(' ');
                    writer.push_str(&attr.name.local);
                    writer.push_str("=\"");
                    writer.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                    writer.push('"');
                }
                writer.push('>');

                let is_void = VOID_ELEMENTS
                    .iter()
                    .any(|tag| (*data.name.local).eq_ignore_ascii_case(tag));
                if is_void && self.children.is_empty() {
                    return;
                }

                for &child_id in &self.children {
                    self.with(child_id).write_outer_html(writer);
                }

                writer.push_str("</");
                writer.push_str(&data.name.local);
                writer.push('>');
            }
        }
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(&self.element_data()?.attrs)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text_content(&mut out);
        out
    }

    fn write_text_content(&self, out: &mut String) {
        match &self.data {
            NodeData::Text(data) => {
                out.push_str(&data.content);
            }
            NodeData::Element(..) | NodeData::Document => {
                for child_id in self.children.iter() {
                    self.with(*child_id).write_text_content(out);
                }
            }
            NodeData::Comment => {}
        }
    }
}

/// It might be wrong to expose this since what does *equality* mean outside the dom?
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeData")
            .field("parent", &self.parent)
            .field("id", &self.id)
            .field("is_structural", &self.flags.is_structural())
            .field("children", &self.children)
            .field("node", &self.data)
            .finish()
    }
}
