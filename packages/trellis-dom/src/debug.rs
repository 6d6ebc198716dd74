use crate::BaseDocument;

impl BaseDocument {
    pub fn debug_log_node(&self, node_id: usize) {
        let Some(node) = self.get_node(node_id) else {
            println!("\nNode {node_id} does not exist");
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::info!(node = node_id, generation = self.generation, "{:?}", node);

        println!("\nNode {} {}", node.id, node.node_debug_str());

        println!("Attrs:");

        for attr in node.attrs().into_iter().flatten() {
            println!("    {}: {}", attr.name.local, attr.value);
        }

        if let Some(element) = node.element_data() {
            if !element.style_attribute.is_empty() {
                println!("Inline style:");
                for decl in &element.style_attribute {
                    let important = if decl.important { " !important" } else { "" };
                    println!("    {}: {}{important}", decl.name, decl.value);
                }
            }
        }

        println!("Block element: {}", self.is_block_element(node_id));
        println!("Parent: {:?}", node.parent);
        println!("Children: {:?}", node.children);
        println!("Text content: {:?}", node.text_content());
    }
}
