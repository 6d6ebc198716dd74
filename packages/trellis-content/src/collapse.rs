//! Collapsing node pairs into sibling runs, and the structural splits this may require.
//!
//! All mutating operations go through a single [`DocumentMutator`] per call so the document
//! generation is bumped once, after the restructuring is complete.

use smallvec::SmallVec;
use trellis_dom::{BaseDocument, DocumentMutator, TreeTraverser};

use crate::ContentError;

type SplitPoints = SmallVec<[usize; 8]>;

/// The outcome of ascending from a head/tail pair, computed without touching the tree
struct CollapsePlan {
    start: usize,
    end: usize,
    /// Nodes whose parent is split before them, lowest first
    start_splits: SplitPoints,
    /// Nodes whose parent is split after them, lowest first
    end_splits: SplitPoints,
}

fn plan_side(
    doc: &BaseDocument,
    root: usize,
    node: usize,
    peer: usize,
    is_start: bool,
    can_split_parent: bool,
) -> (usize, SplitPoints) {
    let mut node = node;
    let mut splits = SplitPoints::new();

    while let Some(parent) = doc.get_node(node).and_then(|n| n.parent) {
        if parent == root || doc.contains(parent, peer, true) {
            break;
        }

        let current = &doc.tree()[node];
        // Once a level is split, the remainder inserted next to the parent is an outer sibling
        // of the parent, so every level above must split as well.
        let has_outer_sibling = !splits.is_empty()
            || if is_start {
                current.previous_sibling().is_some()
            } else {
                current.next_sibling().is_some()
            };

        if has_outer_sibling {
            if !can_split_parent {
                break;
            }
            splits.push(node);
        }
        node = parent;
    }

    (node, splits)
}

fn plan_collapse(
    doc: &BaseDocument,
    root: usize,
    start: usize,
    end: usize,
    can_split_parent: bool,
) -> Option<CollapsePlan> {
    if !doc.contains(root, start, false) || !doc.contains(root, end, false) {
        return None;
    }

    let (start, start_splits) = plan_side(doc, root, start, end, true, can_split_parent);
    let (end, end_splits) = plan_side(doc, root, end, start, false, can_split_parent);

    Some(CollapsePlan {
        start,
        end,
        start_splits,
        end_splits,
    })
}

/// The sibling run covering `start..=end` once both have been collapsed
fn collapsed_run(doc: &BaseDocument, start: usize, end: usize) -> Vec<usize> {
    if doc.contains(start, end, true) {
        return vec![start];
    }
    if doc.contains(end, start, true) {
        return vec![end];
    }

    let start_node = &doc.tree()[start];
    let end_node = &doc.tree()[end];
    match (start_node.parent_node(), end_node.parent) {
        (Some(parent), Some(end_parent)) if parent.id == end_parent => {
            let from = parent.index_of_child(start);
            let to = parent.index_of_child(end);
            match (from, to) {
                (Some(from), Some(to)) if from <= to => parent.children[from..=to].to_vec(),
                _ => vec![start, end],
            }
        }
        _ => vec![start, end],
    }
}

/// Collapse `start` and `end` upwards (without leaving `root`) into the narrowest run of
/// sibling nodes which covers both of them, without changing the tree.
///
/// Ascent on a side stops at the first node with an outer sibling, so the two ends of the
/// result may not share a parent.
pub fn find_collapsed_nodes(doc: &BaseDocument, root: usize, start: usize, end: usize) -> Vec<usize> {
    match plan_collapse(doc, root, start, end, false) {
        Some(plan) => collapsed_run(doc, plan.start, plan.end),
        None => Vec::new(),
    }
}

/// Collapse `start` and `end` upwards (without leaving `root`) into the run of sibling nodes
/// which exactly covers them.
///
/// With `can_split_parent`, ancestors which hold content outside of the span are split so
/// that the run can keep ascending. Without it, this is [`find_collapsed_nodes`].
///
/// Returns an empty list when either node is not inside `root`.
pub fn collapse_nodes(
    doc: &mut BaseDocument,
    root: usize,
    start: usize,
    end: usize,
    can_split_parent: bool,
) -> Vec<usize> {
    let Some(plan) = plan_collapse(doc, root, start, end, can_split_parent) else {
        return Vec::new();
    };

    if !plan.start_splits.is_empty() || !plan.end_splits.is_empty() {
        let mut mutator = doc.mutate();
        for &node in &plan.start_splits {
            split_parent_node_with(&mut mutator, node, true);
        }
        for &node in &plan.end_splits {
            split_parent_node_with(&mut mutator, node, false);
        }
    }

    collapsed_run(doc, plan.start, plan.end)
}

/// Split the parent of `node` in two.
///
/// A shallow clone of the parent receives the siblings before `node` (with `split_before`) or
/// after it, and is inserted before (or after) the parent. Returns the clone, or `None` when
/// there was nothing to move or the parent is not attached.
pub fn split_parent_node(doc: &mut BaseDocument, node: usize, split_before: bool) -> Option<usize> {
    doc.get_node(node)?;
    let mut mutator = doc.mutate();
    split_parent_node_with(&mut mutator, node, split_before)
}

fn split_parent_node_with(
    mutator: &mut DocumentMutator<'_>,
    node: usize,
    split_before: bool,
) -> Option<usize> {
    let parent_id = mutator.parent_id(node)?;
    // The parent must itself be attached for the clone to have somewhere to go
    mutator.parent_id(parent_id)?;

    let parent = mutator.doc.get_node(parent_id)?;
    let index = parent.index_of_child(node)?;
    let moved: Vec<usize> = if split_before {
        parent.children[..index].to_vec()
    } else {
        parent.children[index + 1..].to_vec()
    };
    if moved.is_empty() {
        return None;
    }

    let clone = mutator.shallow_clone_node(parent_id);
    mutator.append_children(clone, &moved);
    if split_before {
        mutator.insert_nodes_before(parent_id, &[clone]);
    } else {
        mutator.insert_nodes_after(parent_id, &[clone]);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        parent = parent_id,
        clone,
        moved = moved.len(),
        split_before,
        "split parent node"
    );

    Some(clone)
}

/// Split the parent of a sibling run so that the run makes up all of the parent's children.
///
/// Content before the run moves into a new left sibling of the parent, content after it into
/// a new right sibling. The parent keeps its identity and is returned as the middle element.
/// Returns `Ok(None)` for an empty run or one whose ends do not share a parent.
pub fn split_balanced_node_range(
    doc: &mut BaseDocument,
    nodes: &[usize],
) -> Result<Option<usize>, ContentError> {
    let (Some(&first), Some(&last)) = (nodes.first(), nodes.last()) else {
        return Ok(None);
    };
    let (first, last) = if doc.is_node_after(first, last) {
        (last, first)
    } else {
        (first, last)
    };
    let (Some(first_node), Some(last_node)) = (doc.get_node(first), doc.get_node(last)) else {
        return Ok(None);
    };
    if first_node.parent != last_node.parent {
        return Ok(None);
    }
    let parent = first_node.parent.ok_or(ContentError::Detached(first))?;
    let grandparent = doc.tree()[parent]
        .parent
        .ok_or(ContentError::Detached(parent))?;

    let leaves_before = doc.verify_splits().then(|| leaf_sequence(doc, grandparent));

    {
        let mut mutator = doc.mutate();
        split_parent_node_with(&mut mutator, first, true);
        split_parent_node_with(&mut mutator, last, false);
    }

    if let Some(leaves_before) = leaves_before {
        if leaf_sequence(doc, grandparent) != leaves_before {
            return Err(ContentError::ContentMismatch {
                parent: grandparent,
            });
        }
    }

    Ok(Some(parent))
}

/// Wrap a sibling run in a new element of type `tag`, inserted where the run starts.
/// The wrapper is flagged as structural.
pub fn wrap(doc: &mut BaseDocument, nodes: &[usize], tag: &str) -> Result<usize, ContentError> {
    let &first = nodes.first().ok_or(ContentError::EmptyRun)?;
    if doc.get_node(first).and_then(|n| n.parent).is_none() {
        return Err(ContentError::Detached(first));
    }

    let mut mutator = doc.mutate();
    let wrapper = mutator.create_html_element(tag);
    mutator.mark_structural(wrapper);
    mutator.insert_nodes_before(first, &[wrapper]);
    mutator.append_children(wrapper, nodes);

    #[cfg(feature = "tracing")]
    tracing::trace!(wrapper, tag, nodes = nodes.len(), "wrapped nodes");

    Ok(wrapper)
}

/// Replace an element with its children. The element is detached but stays in the document.
/// Returns the children which were moved out.
pub fn unwrap(doc: &mut BaseDocument, node: usize) -> Result<Vec<usize>, ContentError> {
    let element = doc.get_node(node).ok_or(ContentError::Detached(node))?;
    if element.parent.is_none() {
        return Err(ContentError::Detached(node));
    }
    let children = element.children.clone();

    let mut mutator = doc.mutate();
    mutator.replace_node_with(node, &children);
    Ok(children)
}

/// Ids of the leaves under `root`, in document order
fn leaf_sequence(doc: &BaseDocument, root: usize) -> Vec<usize> {
    TreeTraverser::new_with_root(doc, root)
        .filter(|id| doc.tree()[*id].is_leaf())
        .collect()
}
