use pretty_assertions::assert_eq;
use trellis_content::{
    BlockElement, InlineElement, NodeBlockElement, Scoper, SelectionBlockScoper, StartFrom,
    collapse_nodes, get_block_element_at_node, get_inline_element_at_node,
};
use trellis_dom::{BaseDocument, DocumentConfig, Position, TreeTraverser};
use trellis_html::HtmlDocument;

fn parse(html: &str) -> (BaseDocument, usize) {
    let doc = HtmlDocument::from_html(html, DocumentConfig::default()).into_inner();
    let root = doc.get_element_by_id("root").unwrap();
    (doc, root)
}

/// Text for text nodes, the tag name for elements
fn describe(doc: &BaseDocument, id: usize) -> String {
    let node = doc.get_node(id).unwrap();
    if node.is_text_node() {
        node.text_content()
    } else {
        node.tag_name()
    }
}

fn ends(doc: &BaseDocument, block: &BlockElement) -> (String, String) {
    (
        describe(doc, block.start_node()),
        describe(doc, block.end_node()),
    )
}

const SAMPLES: &[&str] = &[
    r#"<div id="root">Hello<br>World</div>"#,
    r#"<div id="root"><p><br></p></div>"#,
    r#"<div id="root">abc<span>123<br>456</span></div>"#,
    r#"<div id="root">a<b>b<i>c</i></b><p>d<br>e</p><ul><li>f</li><li>g<span>h<br></span></li></ul>i</div>"#,
    r#"<div id="root"><span>x<div>y</div>z</span><table><tr><td>1</td><td>2<br>3</td></tr></table></div>"#,
];

#[test]
fn hello_world_blocks() {
    let (doc, root) = parse(SAMPLES[0]);
    let hello = doc.find_text_node(root, "Hello").unwrap();
    let world = doc.find_text_node(root, "World").unwrap();

    let block = get_block_element_at_node(&doc, root, hello).unwrap();
    assert!(matches!(block, BlockElement::StartEnd(_)));
    assert_eq!(ends(&doc, &block), ("Hello".to_string(), "BR".to_string()));

    let block = get_block_element_at_node(&doc, root, world).unwrap();
    assert!(matches!(block, BlockElement::StartEnd(_)));
    assert_eq!(ends(&doc, &block), ("World".to_string(), "World".to_string()));
}

#[test]
fn fragment_root_blocks() {
    let doc = HtmlDocument::from_fragment("Hello<br>World", DocumentConfig::default());
    let root = doc.root().unwrap();
    let world = doc.find_text_node(root, "World").unwrap();

    let block = get_block_element_at_node(&doc, root, world).unwrap();
    assert_eq!(ends(&doc, &block), ("World".to_string(), "World".to_string()));
    assert_eq!(block.text_content(&doc), "World");
}

#[test]
fn line_break_in_paragraph() {
    let (doc, root) = parse(SAMPLES[1]);
    let p = doc.get_node(root).unwrap().children[0];
    let br = doc.get_node(p).unwrap().children[0];
    assert_eq!(
        get_block_element_at_node(&doc, root, br),
        Some(BlockElement::Node(NodeBlockElement::new(p)))
    );
}

#[test]
fn text_directly_in_root() {
    let (doc, root) = parse(r#"<div id="root">abc</div>"#);
    let abc = doc.find_text_node(root, "abc").unwrap();
    let block = get_block_element_at_node(&doc, root, abc).unwrap();
    assert!(matches!(block, BlockElement::StartEnd(_)));
    assert_eq!(ends(&doc, &block), ("abc".to_string(), "abc".to_string()));
}

#[test]
fn line_break_inside_inline() {
    let (doc, root) = parse(SAMPLES[2]);
    let abc = doc.find_text_node(root, "abc").unwrap();
    let n456 = doc.find_text_node(root, "456").unwrap();

    let first = get_block_element_at_node(&doc, root, abc).unwrap();
    let second = get_block_element_at_node(&doc, root, n456).unwrap();
    assert_eq!(ends(&doc, &first), ("abc".to_string(), "BR".to_string()));
    assert_eq!(ends(&doc, &second), ("456".to_string(), "456".to_string()));
    assert_eq!(first.text_content(&doc), "abc123");
    assert!(!first.is_after(&doc, &second));
    assert!(second.is_after(&doc, &first));
}

#[test]
fn selection_start_after_line_break_is_empty() {
    let (doc, root) = parse(SAMPLES[0]);
    let world = doc.find_text_node(root, "World").unwrap();
    let position = Position::new(&doc, world, 0);
    let scoper = SelectionBlockScoper::new(&doc, root, position, StartFrom::SelectionStart);

    let inline = scoper.start_inline_element(&doc).unwrap();
    let InlineElement::Empty(empty) = inline else {
        panic!("expected an empty inline, got {inline:?}");
    };
    assert!(empty.position().equal_to(&position));
    assert_eq!(
        Some(inline.parent_block()),
        scoper.start_block_element(&doc)
    );
    assert_eq!(inline.text_content(&doc), "");
}

#[test]
fn every_node_is_inside_its_block() {
    for html in SAMPLES {
        let (doc, root) = parse(html);
        for node in TreeTraverser::new_with_root(&doc, root) {
            let block = get_block_element_at_node(&doc, root, node).unwrap();
            assert!(block.contains(&doc, node), "{html}: node {node} outside its block");
        }
    }
}

#[test]
fn blocks_are_equal_or_ordered() {
    for html in SAMPLES {
        let (doc, root) = parse(html);
        let blocks: Vec<BlockElement> = TreeTraverser::new_with_root(&doc, root)
            .filter_map(|node| get_block_element_at_node(&doc, root, node))
            .collect();

        for a in &blocks {
            for b in &blocks {
                let ordered = [a.equals(b), a.is_after(&doc, b), b.is_after(&doc, a)];
                assert_eq!(
                    ordered.iter().filter(|x| **x).count(),
                    1,
                    "{html}: {a:?} and {b:?}"
                );
            }
        }
    }
}

#[test]
fn collapsed_block_keeps_its_text() {
    for html in SAMPLES {
        let (mut doc, root) = parse(html);
        let leaves: Vec<usize> = TreeTraverser::new_with_root(&doc, root)
            .filter(|id| doc.get_node(*id).unwrap().is_leaf())
            .collect();

        for leaf in leaves {
            let Some(block @ BlockElement::StartEnd(_)) = get_block_element_at_node(&doc, root, leaf)
            else {
                continue;
            };
            let text = block.text_content(&doc);
            let element = block.collapse_to_single_element(&mut doc).unwrap();

            let first = doc.get_first_leaf_node(element).unwrap_or(element);
            let collapsed = get_block_element_at_node(&doc, root, first).unwrap();
            assert_eq!(collapsed.text_content(&doc), text, "{html}");
            assert!(collapsed.contains(&doc, element) || collapsed.start_node() == element);
        }
    }
}

#[test]
fn single_node_collapses_to_itself() {
    let (mut doc, root) = parse(SAMPLES[3]);
    let nodes: Vec<usize> = TreeTraverser::new_with_root(&doc, root)
        .filter(|id| *id != root)
        .collect();
    for node in nodes {
        assert_eq!(collapse_nodes(&mut doc, root, node, node, false), vec![node]);
    }
}

#[test]
fn scoper_trims_to_its_block() {
    for html in SAMPLES {
        let (doc, root) = parse(html);
        let leaves: Vec<usize> = TreeTraverser::new_with_root(&doc, root)
            .filter(|id| doc.get_node(*id).unwrap().is_leaf())
            .collect();

        for &leaf in &leaves {
            let scoper = SelectionBlockScoper::new(
                &doc,
                root,
                Position::new(&doc, leaf, 0),
                StartFrom::SelectionStart,
            );
            let block = get_block_element_at_node(&doc, root, leaf).unwrap();
            assert!(scoper.is_block_in_scope(&doc, &block), "{html}: leaf {leaf}");

            for &other in &leaves {
                let inline = get_inline_element_at_node(&doc, root, other).unwrap();
                if let Some(trimmed) = scoper.trim_inline_element(&doc, inline) {
                    assert!(block.contains(&doc, trimmed.container_node()));
                }
            }
        }
    }
}
