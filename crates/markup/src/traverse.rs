//! Traversal helpers over the markup tree.

use crate::types::{Id, Node, NodeId};

/// Assign ids to any node that does not have one yet.
///
/// The counter is caller-owned so ids stay unique across successive
/// fragment insertions into the same document.
pub fn assign_node_ids(root: &mut Node, next: &mut NodeId) {
    fn walk(node: &mut Node, next: &mut NodeId) {
        if node.id() == Id::UNSET {
            *next = next.wrapping_add(1);
            node.set_id(Id(*next));
        }
        if let Some(children) = node.children_mut() {
            for c in children {
                walk(c, next);
            }
        }
    }
    walk(root, next);
}

pub fn find_node(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    for c in node.children().unwrap_or_default() {
        if let Some(found) = find_node(c, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_mut(node: &mut Node, id: Id) -> Option<&mut Node> {
    if node.id() == id {
        return Some(node);
    }
    if let Some(children) = node.children_mut() {
        for c in children {
            if let Some(found) = find_node_mut(c, id) {
                return Some(found);
            }
        }
    }
    None
}

/// The id of the parent node of `id`, if `id` exists below `node`.
pub fn find_parent_of(node: &Node, id: Id) -> Option<Id> {
    for c in node.children().unwrap_or_default() {
        if c.id() == id {
            return Some(node.id());
        }
        if let Some(found) = find_parent_of(c, id) {
            return Some(found);
        }
    }
    None
}

/// Look an element up by its HTML `id` attribute.
pub fn find_by_html_id(node: &Node, html_id: &str) -> Option<Id> {
    if node.is_element() && node.attr("id") == Some(html_id) {
        return Some(node.id());
    }
    for c in node.children().unwrap_or_default() {
        if let Some(found) = find_by_html_id(c, html_id) {
            return Some(found);
        }
    }
    None
}

/// Collect, in document order, the ids of all descendant elements carrying
/// the named attribute. The starting node itself is not included.
pub fn descendants_with_attr(node: &Node, attr_name: &str, out: &mut Vec<Id>) {
    for c in node.children().unwrap_or_default() {
        if c.is_element() && c.has_attr(attr_name) {
            out.push(c.id());
        }
        descendants_with_attr(c, attr_name, out);
    }
}
