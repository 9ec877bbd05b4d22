//! Error taxonomy for the binding engine.
//!
//! Every kind propagates to whatever invoked `parse`/`place`/`subscribe`/
//! construction; there is no retry logic anywhere in the engine. Attribute
//! coercion is deliberately absent here: it never fails, it degrades to
//! safe defaults (see [`crate::value`]).

use crate::id::ControllerId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinderError {
    /// A class name did not resolve to a registered factory.
    Resolution { class_name: String },
    /// Construction of a resolved class failed; carries the original cause.
    Binding { class_name: String, cause: String },
    /// Illegal attribute combination, duplicate history-handler
    /// registration, or another invalid engine call.
    Configuration(String),
    /// A publication reached a subscriber without a controller-assigned
    /// origin, meaning it bypassed `publish`.
    Protocol(String),
    /// A controller reached teardown with its view unset.
    ViewMissing { controller: ControllerId },
}

impl std::fmt::Display for BinderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinderError::Resolution { class_name } => write!(
                f,
                "resolution error: unknown controller class '{class_name}'; was it registered?"
            ),
            BinderError::Binding { class_name, cause } => write!(
                f,
                "binding error: unable to create an instance of '{class_name}': {cause}"
            ),
            BinderError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            BinderError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            BinderError::ViewMissing { controller } => write!(
                f,
                "view missing: controller {controller:?} reached destroy with no view set"
            ),
        }
    }
}

impl std::error::Error for BinderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_class() {
        let err = BinderError::Binding {
            class_name: "menu".to_string(),
            cause: "factory exploded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("menu"));
        assert!(msg.contains("factory exploded"));
    }
}
