//! The placement operator: put markup or an existing element somewhere
//! relative to a reference node, tearing down displaced controllers and
//! binding freshly inserted ones.

use crate::engine::{Binder, TYPE_ATTR};
use crate::error::BinderError;
use markup::{Id, Node, edit, parse_fragment, traverse};
use std::str::FromStr;

/// What to place: a fragment of markup text, the HTML id of an existing
/// element (when the text does not look like markup), or a node id.
pub enum Content {
    Markup(String),
    Element(Id),
}

/// Where to place it, relative to the reference node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
    First,
    Last,
    /// Replace the reference node itself.
    Replace,
    /// Replace the reference node's children.
    Only,
}

impl FromStr for Position {
    type Err = BinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            "first" => Ok(Position::First),
            "last" => Ok(Position::Last),
            "replace" => Ok(Position::Replace),
            "only" => Ok(Position::Only),
            other => Err(BinderError::Configuration(format!(
                "unknown placement position '{other}'"
            ))),
        }
    }
}

impl Binder {
    /// Place `content` at `position` relative to `reference`.
    ///
    /// Markup text is parsed into a fragment and its nodes get fresh ids;
    /// non-markup text names an existing element by HTML id, which is
    /// moved rather than copied. `Replace` and `Only` first destroy the
    /// controllers of whatever they displace (`Replace` including the
    /// reference element's own). Inserted subtrees are scanned for type
    /// markers immediately afterwards.
    pub fn place(
        &mut self,
        content: Content,
        reference: Id,
        position: Position,
    ) -> Result<(), BinderError> {
        let nodes: Vec<Node> = match content {
            Content::Markup(text) if markup::is_markup(&text) => {
                let mut fragment = parse_fragment(&text);
                traverse::assign_node_ids(&mut fragment, &mut self.next_node_id);
                fragment
                    .children_mut()
                    .map(std::mem::take)
                    .unwrap_or_default()
            }
            Content::Markup(text) => {
                let html_id = text.trim();
                let id = traverse::find_by_html_id(&self.document, html_id).ok_or_else(|| {
                    BinderError::Configuration(format!("no element with id '{html_id}'"))
                })?;
                vec![self.detach_for_move(id, reference)?]
            }
            Content::Element(id) => vec![self.detach_for_move(id, reference)?],
        };

        match position {
            Position::Replace => self.teardown_region(reference, true)?,
            Position::Only => self.teardown_region(reference, false)?,
            _ => {}
        }

        let inserted: Vec<Id> = nodes.iter().map(|n| n.id()).collect();
        let result = match position {
            Position::Before => edit::insert_before(&mut self.document, nodes, reference),
            Position::After => edit::insert_after(&mut self.document, nodes, reference),
            Position::First => edit::prepend_children(&mut self.document, nodes, reference),
            Position::Last => edit::append_children(&mut self.document, nodes, reference),
            Position::Only => edit::replace_children(&mut self.document, nodes, reference),
            Position::Replace => edit::replace_node(&mut self.document, nodes, reference),
        };
        result.map_err(|err| {
            BinderError::Configuration(format!("placement at {position:?} failed: {err}"))
        })?;
        log::debug!(
            target: "binder.place",
            "placed {} node(s) {position:?} {reference:?}",
            inserted.len()
        );

        // A moved element keeps its controller; newly parsed markup gets
        // bound here, synchronously.
        self.parse_nodes(&inserted)
    }

    /// Detach a subtree for a move, validating the destination first: a
    /// reference inside the moved subtree would leave the subsequent edit
    /// with nowhere to re-insert it.
    fn detach_for_move(&mut self, id: Id, reference: Id) -> Result<Node, BinderError> {
        let subtree = traverse::find_node(&self.document, id)
            .ok_or_else(|| BinderError::Configuration(format!("node {id:?} not found")))?;
        if traverse::find_node(subtree, reference).is_some() {
            return Err(BinderError::Configuration(format!(
                "reference {reference:?} lies inside the moved subtree {id:?}"
            )));
        }
        edit::remove_node(&mut self.document, id)
            .map_err(|err| BinderError::Configuration(format!("cannot detach {id:?}: {err}")))
    }

    /// Destroy the controllers bound inside the reference subtree, and of
    /// the reference element itself when it is being replaced.
    fn teardown_region(&mut self, reference: Id, include_reference: bool) -> Result<(), BinderError> {
        let mut region: Vec<Id> = Vec::new();
        if let Some(node) = traverse::find_node(&self.document, reference) {
            traverse::descendants_with_attr(node, TYPE_ATTR, &mut region);
        }
        if include_reference {
            region.push(reference);
        }
        for element in region {
            if let Some(controller) = self.attached.remove(&element) {
                // Destroyed as a root here even if it is some other
                // controller's delegate; destroy severs that link.
                log::debug!(
                    target: "binder.place",
                    "displacing {controller:?} bound to {element:?}"
                );
                self.destroy(controller)?;
            }
        }
        Ok(())
    }
}
