//! Back/forward travel registrar.
//!
//! This is a thin collaborator: it records which controller/method pairs
//! want travel callbacks. The actual browser-history integration lives
//! outside the engine.

use crate::id::ControllerId;

#[derive(Debug, Default)]
pub(crate) struct TravelRegistry {
    handlers: Vec<(ControllerId, String)>,
}

impl TravelRegistry {
    pub(crate) fn register_travel(&mut self, controller: ControllerId, method: &str) {
        log::debug!(
            target: "binder.history",
            "registering travel handler {method:?} for {controller:?}"
        );
        self.handlers.push((controller, method.to_string()));
    }

    pub(crate) fn is_registered(&self, controller: ControllerId) -> bool {
        self.handlers.iter().any(|(c, _)| *c == controller)
    }

    pub(crate) fn contains(&self, controller: ControllerId, method: &str) -> bool {
        self.handlers
            .iter()
            .any(|(c, m)| *c == controller && m == method)
    }
}
