use crate::node::{Node, NodeData};

/// Round `index` down to the nearest char boundary of `text`, clamping it to the text's length
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|idx| text.is_char_boundary(*idx))
        .unwrap_or(0)
}

// Debug print the tree below a node
pub fn walk_tree(indent: usize, node: &Node) {
    // Skip all-whitespace text nodes entirely
    if let NodeData::Text(data) = &node.data {
        if data.content.chars().all(|c| c.is_ascii_whitespace()) {
            return;
        }
    }

    print!("{}", " ".repeat(indent));
    let id = node.id;
    match &node.data {
        NodeData::Document => println!("#Document {id}"),

        NodeData::Text(data) => {
            let content = data.content.trim();
            let end = content
                .char_indices()
                .nth(10)
                .map(|(idx, _)| idx)
                .unwrap_or(content.len());
            if end < content.len() {
                println!("#text {id}: {}...", content[..end].escape_default())
            } else {
                println!("#text {id}: {}", content.escape_default())
            }
        }

        NodeData::Comment => println!("<!-- COMMENT {id} -->"),

        NodeData::Element(data) => {
            print!("<{} {id}", data.name.local);
            for attr in data.attrs.iter() {
                print!(" {}=\"{}\"", attr.name.local, attr.value);
            }
            if node.flags.is_structural() {
                print!(" [structural]");
            }
            if !node.children.is_empty() {
                println!(">");
            } else {
                println!("/>");
            }
        }
    }

    if !node.children.is_empty() {
        for child_id in node.children.iter() {
            walk_tree(indent + 2, node.with(*child_id));
        }

        if let NodeData::Element(data) = &node.data {
            println!("{}</{}>", " ".repeat(indent), data.name.local);
        }
    }
}
