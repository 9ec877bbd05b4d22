//! Event-topic identifiers.
//!
//! Topics are opaque string constants; the engine attaches no meaning to
//! their spelling. Downstream code defines its own `Topic` constants the
//! same way.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Topic(pub &'static str);

impl Topic {
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Published once per controller construction when the engine runs
/// instrumented.
pub const CONTROLLER_CREATED: Topic = Topic("binder/controller/created");

/// Published by `restore_initial_state`, carrying the original markup
/// snapshot of the controller's root element.
pub const RESTORE_INITIAL_STATE: Topic = Topic("binder/history/restore-initial-state");
