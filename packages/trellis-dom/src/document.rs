use crate::config::DocumentConfig;
use crate::mutator::DocumentMutator;
use crate::node::{Attributes, ElementData, Node, NodeData, NodeFlags, TextNodeData};
use crate::traversal::TreeTraverser;
use markup5ever::QualName;
use slab::Slab;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DOCUMENT_ID: AtomicUsize = AtomicUsize::new(0);

const DEFAULT_WRAPPER_TAG: &str = "div";

pub struct BaseDocument {
    /// ID of the document
    id: usize,

    /// A slab-backed tree of nodes
    ///
    /// We pin the tree to a guarantee to the nodes it creates that the tree is stable in memory.
    /// There is no way to create the tree - publicly or privately - that would invalidate that invariant.
    pub(crate) nodes: Box<Slab<Node>>,

    /// Incremented every time a [`DocumentMutator`] is flushed. Values derived from the tree
    /// (blocks, scopers) remember the generation they were computed at.
    pub(crate) generation: u64,

    /// Tag name used for wrapper elements
    pub(crate) wrapper_tag: String,

    /// Tag names treated as block elements on top of the built-in table
    pub(crate) extra_block_tags: Vec<String>,

    /// Whether structural splits check that the leaf sequence is preserved
    pub(crate) verify_splits: bool,
}

impl Default for BaseDocument {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl BaseDocument {
    /// Create a new (empty) [`BaseDocument`] with the specified configuration
    pub fn new(config: DocumentConfig) -> Self {
        let id = NEXT_DOCUMENT_ID.fetch_add(1, Ordering::SeqCst);

        let wrapper_tag = config
            .wrapper_tag
            .map(|tag| tag.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_WRAPPER_TAG.to_string());
        let extra_block_tags = config
            .extra_block_tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.to_ascii_lowercase())
            .collect();

        let mut doc = Self {
            id,
            nodes: Box::new(Slab::new()),
            generation: 0,
            wrapper_tag,
            extra_block_tags,
            verify_splits: config.verify_splits.unwrap_or(true),
        };

        // Initialise document with root Document node
        doc.create_node(NodeData::Document);

        doc
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The current mutation generation of the document
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn wrapper_tag(&self) -> &str {
        &self.wrapper_tag
    }

    pub fn verify_splits(&self) -> bool {
        self.verify_splits
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn mutate<'doc>(&'doc mut self) -> DocumentMutator<'doc> {
        DocumentMutator::new(self)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Option<&Node> {
        TreeTraverser::new(self)
            .map(|id| &self.nodes[id])
            .find(|node| node.is_tag("body"))
    }

    /// Find an attached element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        TreeTraverser::new(self).find(|node_id| {
            self.nodes[*node_id]
                .element_data()
                .and_then(|el| el.id.as_deref())
                == Some(id)
        })
    }

    pub fn create_node(&mut self, node_data: NodeData) -> usize {
        let slab_ptr = self.nodes.as_mut() as *mut Slab<Node>;

        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(slab_ptr, id, node_data));

        id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        let content = text.to_string();
        let data = NodeData::Text(TextNodeData::new(content));
        self.create_node(data)
    }

    pub fn create_element_node(&mut self, name: QualName, attrs: Attributes) -> usize {
        self.create_node(NodeData::Element(ElementData::from_attributes(name, attrs)))
    }

    /// Clone a node without its children, as done when an element is split in two.
    ///
    /// Element clones keep every attribute except `id` and are flagged as structural.
    pub fn shallow_clone_node(&mut self, node_id: usize) -> usize {
        let data = match &self.nodes[node_id].data {
            NodeData::Element(element) => NodeData::Element(ElementData::from_attributes(
                element.name.clone(),
                element.attrs.for_split_clone(),
            )),
            other => other.clone(),
        };

        let new_node_id = self.create_node(data);
        if self.nodes[new_node_id].is_element() {
            self.nodes[new_node_id]
                .flags
                .insert(NodeFlags::IS_STRUCTURAL);
        }
        new_node_id
    }

    /// Insert `inserted_node_ids` (in order) immediately before `node_id` in its parent.
    /// Nodes which are currently attached elsewhere are detached first.
    #[track_caller]
    pub(crate) fn insert_before(&mut self, node_id: usize, inserted_node_ids: &[usize]) {
        for &inserted_id in inserted_node_ids {
            self.detach_node(inserted_id);
        }

        let node = &self.nodes[node_id];
        let parent_id = node.parent.expect("insert_before anchor must have a parent");
        let node_child_idx = node.child_index().unwrap_or_default();

        let parent = &mut self.nodes[parent_id];
        let mut children = std::mem::take(&mut parent.children);
        children.splice(
            node_child_idx..node_child_idx,
            inserted_node_ids.iter().copied(),
        );

        // Update parent values
        for &child_id in inserted_node_ids {
            self.nodes[child_id].parent = Some(parent_id);
        }

        self.nodes[parent_id].children = children;
    }

    /// Insert `appended_node_ids` (in order) as the next siblings of `node_id`
    #[track_caller]
    pub(crate) fn insert_after(&mut self, node_id: usize, appended_node_ids: &[usize]) {
        for &appended_id in appended_node_ids {
            self.detach_node(appended_id);
        }

        let node = &self.nodes[node_id];
        let parent_id = node.parent.expect("insert_after anchor must have a parent");
        let node_child_idx = node.child_index().unwrap_or_default() + 1;

        let parent = &mut self.nodes[parent_id];
        let mut children = std::mem::take(&mut parent.children);
        children.splice(
            node_child_idx..node_child_idx,
            appended_node_ids.iter().copied(),
        );

        for &child_id in appended_node_ids {
            self.nodes[child_id].parent = Some(parent_id);
        }

        self.nodes[parent_id].children = children;
    }

    /// Detach a node (and its subtree) from its parent. The node stays alive in the slab.
    pub(crate) fn detach_node(&mut self, node_id: usize) {
        let Some(parent_id) = self.nodes[node_id].parent.take() else {
            return;
        };
        self.nodes[parent_id]
            .children
            .retain(|child_id| *child_id != node_id);
    }

    /// Detach a node and drop it, along with all of its descendants, from the slab
    pub(crate) fn remove_and_drop_node(&mut self, node_id: usize) -> Option<Node> {
        fn remove_node_ignoring_parent(doc: &mut BaseDocument, node_id: usize) -> Option<Node> {
            let node = doc.nodes.try_remove(node_id);
            if let Some(node) = &node {
                for &child in &node.children {
                    remove_node_ignoring_parent(doc, child);
                }
            }
            node
        }

        self.detach_node(node_id);
        remove_node_ignoring_parent(self, node_id)
    }

    /// The closest element among the node and its ancestors
    pub fn closest_element(&self, node_id: usize) -> Option<usize> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.get_node(id)?;
            if node.is_element() {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    pub fn print_tree(&self) {
        crate::util::walk_tree(0, self.root_node());
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{local_name, ns};

    fn element(doc: &mut BaseDocument, tag: &str) -> usize {
        let name = QualName::new(None, ns!(html), tag.into());
        doc.create_element_node(name, Attributes::default())
    }

    #[test]
    fn insert_before_and_after_keep_order() {
        let mut doc = BaseDocument::default();
        let parent = element(&mut doc, "div");
        let a = doc.create_text_node("a");
        let b = doc.create_text_node("b");
        let c = doc.create_text_node("c");
        {
            let mut mutator = doc.mutate();
            mutator.append_children(0, &[parent]);
            mutator.append_children(parent, &[b]);
            mutator.insert_nodes_before(b, &[a]);
            mutator.insert_nodes_after(b, &[c]);
        }

        assert_eq!(doc.nodes[parent].children, vec![a, b, c]);
        assert_eq!(doc.nodes[parent].text_content(), "abc");
    }

    #[test]
    fn shallow_clone_drops_id_and_is_structural() {
        let mut doc = BaseDocument::default();
        let name = QualName::new(None, ns!(html), local_name!("span"));
        let attrs = Attributes::new(vec![
            crate::Attribute {
                name: QualName::new(None, ns!(), local_name!("id")),
                value: "x".to_string(),
            },
            crate::Attribute {
                name: QualName::new(None, ns!(), local_name!("class")),
                value: "bold".to_string(),
            },
        ]);
        let span = doc.create_element_node(name, attrs);
        let clone = doc.shallow_clone_node(span);

        let clone = doc.get_node(clone).unwrap();
        assert!(clone.flags.is_structural());
        let data = clone.element_data().unwrap();
        assert_eq!(data.id, None);
        assert_eq!(data.attrs.get("class"), Some("bold"));
    }

    #[test]
    fn mutation_bumps_generation() {
        let mut doc = BaseDocument::default();
        let before = doc.generation();
        let text = doc.create_text_node("x");
        doc.mutate().append_children(0, &[text]);
        assert!(doc.generation() > before);
    }
}
