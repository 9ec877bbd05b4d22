//! Structural edits on the markup tree, addressed by node id.
//!
//! These are the primitive moves the placement operator composes. Every
//! operation either succeeds or reports that the reference node was not
//! found; partial mutation does not occur.

use crate::traverse::{find_node_mut, find_parent_of};
use crate::types::{Id, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditError {
    NodeNotFound(Id),
    NoParent(Id),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::NodeNotFound(id) => write!(f, "node {id:?} not found"),
            EditError::NoParent(id) => write!(f, "node {id:?} has no parent"),
        }
    }
}

impl std::error::Error for EditError {}

/// Detach the node with `id` from the tree and return it.
pub fn remove_node(root: &mut Node, id: Id) -> Result<Node, EditError> {
    let parent_id = find_parent_of(root, id).ok_or(EditError::NoParent(id))?;
    let parent = find_node_mut(root, parent_id).ok_or(EditError::NodeNotFound(parent_id))?;
    let children = parent.children_mut().ok_or(EditError::NodeNotFound(id))?;
    let index = children
        .iter()
        .position(|c| c.id() == id)
        .ok_or(EditError::NodeNotFound(id))?;
    Ok(children.remove(index))
}

/// Insert `nodes` as siblings immediately before the reference node.
pub fn insert_before(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    insert_adjacent(root, nodes, reference, 0)
}

/// Insert `nodes` as siblings immediately after the reference node.
pub fn insert_after(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    insert_adjacent(root, nodes, reference, 1)
}

fn insert_adjacent(
    root: &mut Node,
    nodes: Vec<Node>,
    reference: Id,
    offset: usize,
) -> Result<(), EditError> {
    let parent_id = find_parent_of(root, reference).ok_or(EditError::NoParent(reference))?;
    let parent = find_node_mut(root, parent_id).ok_or(EditError::NodeNotFound(parent_id))?;
    let children = parent
        .children_mut()
        .ok_or(EditError::NodeNotFound(reference))?;
    let index = children
        .iter()
        .position(|c| c.id() == reference)
        .ok_or(EditError::NodeNotFound(reference))?;
    splice_in(children, index + offset, nodes);
    Ok(())
}

/// Insert `nodes` as the first children of the reference node.
pub fn prepend_children(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    let target = find_node_mut(root, reference).ok_or(EditError::NodeNotFound(reference))?;
    let children = target
        .children_mut()
        .ok_or(EditError::NodeNotFound(reference))?;
    splice_in(children, 0, nodes);
    Ok(())
}

/// Insert `nodes` as the last children of the reference node.
pub fn append_children(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    let target = find_node_mut(root, reference).ok_or(EditError::NodeNotFound(reference))?;
    let children = target
        .children_mut()
        .ok_or(EditError::NodeNotFound(reference))?;
    children.extend(nodes);
    Ok(())
}

/// Replace all children of the reference node with `nodes`.
pub fn replace_children(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    let target = find_node_mut(root, reference).ok_or(EditError::NodeNotFound(reference))?;
    let children = target
        .children_mut()
        .ok_or(EditError::NodeNotFound(reference))?;
    children.clear();
    children.extend(nodes);
    Ok(())
}

/// Replace the reference node itself with `nodes`.
pub fn replace_node(root: &mut Node, nodes: Vec<Node>, reference: Id) -> Result<(), EditError> {
    let parent_id = find_parent_of(root, reference).ok_or(EditError::NoParent(reference))?;
    let parent = find_node_mut(root, parent_id).ok_or(EditError::NodeNotFound(parent_id))?;
    let children = parent
        .children_mut()
        .ok_or(EditError::NodeNotFound(reference))?;
    let index = children
        .iter()
        .position(|c| c.id() == reference)
        .ok_or(EditError::NodeNotFound(reference))?;
    children.remove(index);
    splice_in(children, index, nodes);
    Ok(())
}

fn splice_in(children: &mut Vec<Node>, index: usize, nodes: Vec<Node>) {
    for (n, node) in nodes.into_iter().enumerate() {
        children.insert(index + n, node);
    }
}
