use std::collections::HashSet;

use crate::node::Attributes;
use crate::{Attribute, BaseDocument, NodeData, NodeFlags, QualName, ns};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendTextErr {
    /// The node is not a text node
    NotTextNode,
}

pub struct DocumentMutator<'doc> {
    /// Document is public as an escape hatch, but users of this API should ideally avoid using it
    /// and prefer exposing additional functionality in DocumentMutator.
    pub doc: &'doc mut BaseDocument,

    // Nodes whose structure or data changed since the last flush
    touched_nodes: HashSet<usize>,
}

impl Drop for DocumentMutator<'_> {
    fn drop(&mut self) {
        self.flush(); // Defined at bottom of file
    }
}

impl DocumentMutator<'_> {
    pub fn new<'doc>(doc: &'doc mut BaseDocument) -> DocumentMutator<'doc> {
        DocumentMutator {
            doc,
            touched_nodes: HashSet::new(),
        }
    }

    pub fn node_has_parent(&self, node_id: usize) -> bool {
        self.doc.nodes[node_id].parent.is_some()
    }

    pub fn parent_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].parent
    }

    pub fn previous_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].backward(1).map(|node| node.id)
    }

    pub fn last_child_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].children.last().copied()
    }

    pub fn element_name(&self, node_id: usize) -> Option<&QualName> {
        self.doc.nodes[node_id].element_data().map(|el| &el.name)
    }

    pub fn create_comment_node(&mut self) -> usize {
        self.doc.create_node(NodeData::Comment)
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_text_node(text)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        self.doc.create_element_node(name, Attributes::new(attrs))
    }

    /// Create an attribute-less element in the HTML namespace
    pub fn create_html_element(&mut self, tag: &str) -> usize {
        let name = QualName::new(None, ns!(html), tag.to_ascii_lowercase().into());
        self.create_element(name, Vec::new())
    }

    /// Remove all of the children from old_parent_id and append them to new_parent_id
    pub fn reparent_children(&mut self, old_parent_id: usize, new_parent_id: usize) {
        let child_ids = std::mem::take(&mut self.doc.nodes[old_parent_id].children);
        for &child_id in &child_ids {
            self.doc.nodes[child_id].parent = None;
        }
        self.touched_nodes.insert(old_parent_id);
        self.append_children(new_parent_id, &child_ids);
    }

    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        for child_id in child_ids.iter().copied() {
            let old_parent = self.doc.nodes[child_id].parent;
            self.doc.detach_node(child_id);
            self.doc.nodes[parent_id].children.push(child_id);
            self.doc.nodes[child_id].parent = Some(parent_id);
            if let Some(old_parent_id) = old_parent {
                self.touched_nodes.insert(old_parent_id);
            }
        }

        self.touched_nodes.insert(parent_id);
    }

    pub fn insert_nodes_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.touch_parent(anchor_node_id);
        self.touch_parents(new_node_ids);
        self.doc.insert_before(anchor_node_id, new_node_ids);
    }

    pub fn insert_nodes_after(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.touch_parent(anchor_node_id);
        self.touch_parents(new_node_ids);
        self.doc.insert_after(anchor_node_id, new_node_ids);
    }

    pub fn replace_node_with(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.insert_nodes_before(anchor_node_id, new_node_ids);
        self.remove_node(anchor_node_id);
    }

    /// Detach the node from its parent. The node stays alive and can be re-inserted.
    pub fn remove_node(&mut self, node_id: usize) {
        self.touch_parent(node_id);
        self.doc.detach_node(node_id);
    }

    pub fn remove_node_if_unparented(&mut self, node_id: usize) {
        if let Some(node) = self.doc.get_node(node_id) {
            if node.parent.is_none() && node_id != 0 {
                self.doc.remove_and_drop_node(node_id);
            }
        }
    }

    pub fn append_text_to_node(&mut self, node_id: usize, text: &str) -> Result<(), AppendTextErr> {
        match self.doc.nodes[node_id].text_data_mut() {
            Some(data) => {
                data.content += text;
                self.touched_nodes.insert(node_id);
                Ok(())
            }
            None => Err(AppendTextErr::NotTextNode),
        }
    }

    pub fn set_node_text(&mut self, node_id: usize, value: &str) {
        let Some(node) = self.doc.get_node_mut(node_id) else {
            return;
        };

        let text = match node.data {
            NodeData::Text(ref mut text) => text,
            _ => return,
        };

        if text.content != value {
            text.content.clear();
            text.content.push_str(value);
            self.touched_nodes.insert(node_id);
        }
    }

    pub fn shallow_clone_node(&mut self, node_id: usize) -> usize {
        self.doc.shallow_clone_node(node_id)
    }

    pub fn mark_structural(&mut self, node_id: usize) {
        self.doc.nodes[node_id]
            .flags
            .insert(NodeFlags::IS_STRUCTURAL);
    }

    pub fn add_attrs_if_missing(&mut self, node_id: usize, attrs: Vec<Attribute>) {
        let Some(element_data) = self.doc.nodes[node_id].element_data() else {
            return;
        };

        let existing_names = element_data
            .attrs
            .iter()
            .map(|e| e.name.clone())
            .collect::<HashSet<_>>();

        for attr in attrs
            .into_iter()
            .filter(|attr| !existing_names.contains(&attr.name))
        {
            self.set_attribute(node_id, attr.name, &attr.value);
        }
    }

    pub fn set_attribute(&mut self, node_id: usize, name: QualName, value: &str) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        let attr = (*name.local).to_ascii_lowercase();
        element.attrs.set(name, value);

        match attr.as_str() {
            "style" => element.flush_style_attribute(),
            "id" => element.flush_id_attribute(),
            _ => {}
        }
        self.touched_nodes.insert(node_id);
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: QualName) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        // FIXME: check namespace
        element.attrs.retain(|attr| attr.name.local != name.local);

        match (*name.local).to_ascii_lowercase().as_str() {
            "style" => element.flush_style_attribute(),
            "id" => element.flush_id_attribute(),
            _ => {}
        }
        self.touched_nodes.insert(node_id);
    }
}

impl<'doc> DocumentMutator<'doc> {
    pub fn flush(&mut self) {
        if self.touched_nodes.is_empty() {
            return;
        }

        self.doc.generation += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            document = self.doc.id(),
            generation = self.doc.generation,
            touched = self.touched_nodes.len(),
            "flushed document mutations"
        );

        self.touched_nodes.clear();
    }

    fn touch_parent(&mut self, node_id: usize) {
        if let Some(parent_id) = self.doc.nodes[node_id].parent {
            self.touched_nodes.insert(parent_id);
        }
    }

    fn touch_parents(&mut self, node_ids: &[usize]) {
        for &node_id in node_ids {
            self.touch_parent(node_id);
        }
    }
}
