//! Tree scanning: find type-marked elements and instantiate their
//! controllers.
//!
//! Scanning is depth-first in document order, descendants before the
//! start node itself. Already-attached elements are skipped so a rescan
//! of a live region never double-binds.

use crate::engine::{Binder, TYPE_ATTR};
use crate::error::BinderError;
use crate::id::ControllerId;
use markup::{Id, Node, traverse};
use std::rc::Rc;

impl Binder {
    /// Scan the whole document for type-marked elements.
    pub fn parse(&mut self) -> Result<(), BinderError> {
        let root = self.document.id();
        self.parse_nodes(&[root])
    }

    /// Scan the given subtrees. A document node stands for its children;
    /// non-element nodes are ignored.
    pub fn parse_nodes(&mut self, nodes: &[Id]) -> Result<(), BinderError> {
        for &node_id in nodes {
            let roots: Vec<Id> = {
                let Some(node) = traverse::find_node(&self.document, node_id) else {
                    log::debug!(target: "binder.parse", "skipping missing node {node_id:?}");
                    continue;
                };
                match node {
                    Node::Document { children, .. } => children.iter().map(|c| c.id()).collect(),
                    _ => vec![node_id],
                }
            };
            for root in roots {
                self.parse_subtree(root)?;
            }
        }
        Ok(())
    }

    fn parse_subtree(&mut self, root: Id) -> Result<(), BinderError> {
        let marked: Vec<Id> = {
            let Some(node) = traverse::find_node(&self.document, root) else {
                return Ok(());
            };
            if !node.is_element() {
                return Ok(());
            }
            let mut found = Vec::new();
            traverse::descendants_with_attr(node, TYPE_ATTR, &mut found);
            // The descendant query excludes the subtree root; a freshly
            // inserted fragment's own marker still has to bind.
            if node.has_attr(TYPE_ATTR) {
                found.push(root);
            }
            found
        };

        for element in marked {
            if let Some(existing) = self.attached.get(&element) {
                log::debug!(
                    target: "binder.parse",
                    "element {element:?} already bound to {existing:?}, skipping"
                );
                continue;
            }
            self.create_controller_for(element)?;
        }
        Ok(())
    }

    /// Instantiate the controller named by the element's type marker and
    /// attach it. Fails if the element carries no marker, already has a
    /// controller, or the class cannot be resolved or constructed.
    pub fn create_controller_for(&mut self, element: Id) -> Result<ControllerId, BinderError> {
        let class_name = {
            let node = traverse::find_node(&self.document, element).ok_or_else(|| {
                BinderError::Configuration(format!("element {element:?} not found"))
            })?;
            node.attr(TYPE_ATTR)
                .map(str::to_string)
                .ok_or_else(|| {
                    BinderError::Configuration(format!(
                        "element {element:?} carries no {TYPE_ATTR} attribute"
                    ))
                })?
        };
        if let Some(existing) = self.attached.get(&element) {
            return Err(BinderError::Configuration(format!(
                "element {element:?} already bound to {existing:?}"
            )));
        }

        // Resolution failure for a markup-named class surfaces as a
        // binding error carrying the class name.
        let descriptor = self
            .registry
            .resolve(&class_name)
            .map_err(|err| match err {
                BinderError::Resolution { class_name } => BinderError::Binding {
                    cause: format!("class '{class_name}' is not registered"),
                    class_name,
                },
                other => other,
            })?;

        let params = Rc::clone(&descriptor.params);
        let controller = self
            .construct_controller(&class_name, Some(element), params, None)
            .map_err(|err| match err {
                err @ BinderError::Binding { .. } => err,
                other => BinderError::Binding {
                    class_name: class_name.clone(),
                    cause: other.to_string(),
                },
            })?;

        self.attached.insert(element, controller);
        log::info!(
            target: "binder.parse",
            "bound {controller:?} ({class_name}) to element {element:?}"
        );
        Ok(controller)
    }
}
