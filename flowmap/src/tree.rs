//! Pure operations over the project forest. Every operation returns a new
//! forest: the path from a root down to the edited node is rebuilt, all
//! other subtrees are shared by `Rc` handle with the input. Operations
//! targeting an absent id are silent no-ops returning the input unchanged;
//! callers never check a success flag.

use std::rc::Rc;

use crate::ids;
use crate::model::{Geometry, ItemType, LonLat, NodeKind, NodePatch, NodeRef, ProjectNode};

/// Depth-first pre-order search; first match wins.
pub fn find<'a>(nodes: &'a [NodeRef], id: &str) -> Option<&'a NodeRef> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let NodeKind::Group { children } = &node.kind {
            if let Some(found) = find(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Merge `patch` into the node with `id`, wherever it sits in the forest.
pub fn update(nodes: &[NodeRef], id: &str, patch: &NodePatch) -> Vec<NodeRef> {
    update_in(nodes, id, patch).unwrap_or_else(|| nodes.to_vec())
}

fn update_in(nodes: &[NodeRef], id: &str, patch: &NodePatch) -> Option<Vec<NodeRef>> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.id == id {
            let mut edited = (**node).clone();
            patch.apply(&mut edited);
            return Some(replace_at(nodes, idx, Rc::new(edited)));
        }
        if let NodeKind::Group { .. } = &node.kind {
            if let Some(rebuilt) = descend(node, |children| update_in(children, id, patch)) {
                return Some(replace_at(nodes, idx, rebuilt));
            }
        }
    }
    None
}

/// Remove the node with `id` (and, for groups, its entire subtree).
pub fn remove(nodes: &[NodeRef], id: &str) -> Vec<NodeRef> {
    remove_in(nodes, id).unwrap_or_else(|| nodes.to_vec())
}

fn remove_in(nodes: &[NodeRef], id: &str) -> Option<Vec<NodeRef>> {
    if let Some(idx) = nodes.iter().position(|n| n.id == id) {
        let mut out = nodes.to_vec();
        out.remove(idx);
        return Some(out);
    }
    for (idx, node) in nodes.iter().enumerate() {
        if let NodeKind::Group { .. } = &node.kind {
            if let Some(rebuilt) = descend(node, |children| remove_in(children, id)) {
                return Some(replace_at(nodes, idx, rebuilt));
            }
        }
    }
    None
}

/// Append `new_node` to the children of the group with `parent_id`.
/// Inserting under an item, or under an absent id, is a silent no-op.
pub fn insert_child(nodes: &[NodeRef], parent_id: &str, new_node: ProjectNode) -> Vec<NodeRef> {
    insert_in(nodes, parent_id, &new_node).unwrap_or_else(|| nodes.to_vec())
}

fn insert_in(nodes: &[NodeRef], parent_id: &str, new_node: &ProjectNode) -> Option<Vec<NodeRef>> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.id == parent_id {
            return match &node.kind {
                NodeKind::Group { children } => {
                    let mut grown = children.clone();
                    grown.push(Rc::new(new_node.clone()));
                    let mut edited = (**node).clone();
                    edited.kind = NodeKind::Group { children: grown };
                    Some(replace_at(nodes, idx, Rc::new(edited)))
                }
                NodeKind::Item { .. } => None,
            };
        }
        if let NodeKind::Group { .. } = &node.kind {
            if let Some(rebuilt) = descend(node, |children| insert_in(children, parent_id, new_node))
            {
                return Some(replace_at(nodes, idx, rebuilt));
            }
        }
    }
    None
}

/// Append a root-level node.
pub fn insert_root(nodes: &[NodeRef], new_node: ProjectNode) -> Vec<NodeRef> {
    let mut out = nodes.to_vec();
    out.push(Rc::new(new_node));
    out
}

/// Deep-copy the subtree rooted at `id` and insert the copy immediately
/// after the original in its parent's sequence. The cloned root gets a
/// fresh id and a " (Copy)" name suffix; descendants keep their original
/// ids verbatim.
pub fn duplicate(nodes: &[NodeRef], id: &str, now_ms: u64) -> Vec<NodeRef> {
    duplicate_in(nodes, id, now_ms).unwrap_or_else(|| nodes.to_vec())
}

fn duplicate_in(nodes: &[NodeRef], id: &str, now_ms: u64) -> Option<Vec<NodeRef>> {
    if let Some(idx) = nodes.iter().position(|n| n.id == id) {
        let original = &nodes[idx];
        let mut copy = deep_clone(original);
        copy.id = ids::copy_id(&original.id, now_ms);
        copy.name = format!("{} (Copy)", original.name);
        let mut out = nodes.to_vec();
        out.insert(idx + 1, Rc::new(copy));
        return Some(out);
    }
    for (idx, node) in nodes.iter().enumerate() {
        if let NodeKind::Group { .. } = &node.kind {
            if let Some(rebuilt) = descend(node, |children| duplicate_in(children, id, now_ms)) {
                return Some(replace_at(nodes, idx, rebuilt));
            }
        }
    }
    None
}

/// Full value copy of a subtree: no `Rc` handle in the result is shared
/// with the input.
fn deep_clone(node: &ProjectNode) -> ProjectNode {
    let mut copy = node.clone();
    if let NodeKind::Group { children } = &mut copy.kind {
        *children = children
            .iter()
            .map(|child| Rc::new(deep_clone(child)))
            .collect();
    }
    copy
}

/// Run `op` against a group's children; on a hit, rebuild this node around
/// the new children.
fn descend<F>(node: &NodeRef, op: F) -> Option<NodeRef>
where
    F: FnOnce(&[NodeRef]) -> Option<Vec<NodeRef>>,
{
    let NodeKind::Group { children } = &node.kind else {
        return None;
    };
    let rebuilt = op(children)?;
    let mut edited = (**node).clone();
    edited.kind = NodeKind::Group { children: rebuilt };
    Some(Rc::new(edited))
}

fn replace_at(nodes: &[NodeRef], idx: usize, node: NodeRef) -> Vec<NodeRef> {
    let mut out = nodes.to_vec();
    out[idx] = node;
    out
}

/// Seed a fresh group the way the sidebar's "add folder" action does.
pub fn new_group(now_ms: u64) -> ProjectNode {
    ProjectNode::group(ids::group_id(now_ms), "New Group")
}

/// Seed a fresh item with the default geometry for its type.
pub fn new_item(item_type: ItemType, now_ms: u64) -> ProjectNode {
    ProjectNode::item(
        ids::item_id(now_ms),
        format!("New {}", item_type.as_str()),
        item_type,
        default_geometry(item_type),
    )
}

fn default_geometry(item_type: ItemType) -> Option<Geometry> {
    match item_type {
        ItemType::Arc | ItemType::Line => Some(Geometry::Endpoints {
            source: LonLat(-46.0, -23.0),
            target: LonLat(-43.0, -22.0),
        }),
        ItemType::Scatterplot => Some(Geometry::Point {
            coordinates: LonLat(-46.0, -23.0),
        }),
        ItemType::GeoJson | ItemType::Unknown => None,
    }
}
