//! View store: allocation and teardown of view handles.

use crate::id::ViewId;
use std::collections::HashSet;

/// Engine-owned store of live views.
///
/// Factories allocate a view here during construction; `destroy` on a
/// controller tears its view down after all delegates are gone.
#[derive(Debug, Default)]
pub struct Views {
    next: u64,
    live: HashSet<ViewId>,
}

impl Views {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> ViewId {
        self.next = self.next.wrapping_add(1);
        let id = ViewId::from_raw(self.next);
        self.live.insert(id);
        id
    }

    pub fn is_live(&self, id: ViewId) -> bool {
        self.live.contains(&id)
    }

    /// Returns `true` if the view existed and was torn down.
    pub fn destroy(&mut self, id: ViewId) -> bool {
        let removed = self.live.remove(&id);
        if removed {
            log::trace!(target: "binder.view", "destroyed view {id:?}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut views = Views::new();
        let a = views.create();
        let b = views.create();
        assert_ne!(a, b);
        assert!(views.is_live(a));

        assert!(views.destroy(a));
        assert!(!views.is_live(a));
        assert!(!views.destroy(a));
        assert_eq!(views.len(), 1);
    }
}
