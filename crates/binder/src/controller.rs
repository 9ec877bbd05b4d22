//! Controller records and the lifecycle operations on them: construction
//! from declared parameters, delegate creation and removal, and teardown.
//!
//! Records live in an engine-owned arena keyed by [`ControllerId`]; the
//! parent/delegate links between records form a tree because a parent is
//! assigned exactly once, at delegate creation.

use crate::engine::{BIND_ATTR, Binder, GROUP_ATTR, TYPE_ATTR};
use crate::error::BinderError;
use crate::id::{ControllerId, ViewId};
use crate::topics;
use crate::value::{TypeTag, Value, coerce};
use markup::{Id, Node, traverse};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Request to hang a delegate off an existing controller.
///
/// A `None` class name makes delegate creation a no-op; `inject_data`
/// copies the parent's current bound-property values into the delegate.
pub struct DelegateSpec {
    pub class_name: Option<String>,
    pub element: Option<Id>,
    pub inject_data: bool,
}

impl Default for DelegateSpec {
    fn default() -> Self {
        Self {
            class_name: None,
            element: None,
            inject_data: true,
        }
    }
}

pub(crate) struct ControllerRecord {
    pub class_name: String,
    pub view: Option<ViewId>,
    pub root_element: Option<Id>,
    /// Declared parameter table, shared with the class descriptor and
    /// with any delegates.
    pub params: Rc<BTreeMap<String, TypeTag>>,
    /// The subset of `params` that actually received a value.
    pub bound: BTreeMap<String, TypeTag>,
    pub properties: BTreeMap<String, Value>,
    pub parent: Option<ControllerId>,
    pub delegates: Vec<ControllerId>,
    /// Pre-binding clone of the root element, for state restoration.
    pub original_snapshot: Option<Box<Node>>,
}

/// Arena of live controller records. Ids are never reused.
#[derive(Default)]
pub(crate) struct Controllers {
    next: u64,
    live: HashMap<ControllerId, ControllerRecord>,
}

impl Controllers {
    pub(crate) fn insert(&mut self, record: ControllerRecord) -> ControllerId {
        self.next = self.next.wrapping_add(1);
        let id = ControllerId::from_raw(self.next);
        self.live.insert(id, record);
        id
    }

    pub(crate) fn get(&self, id: ControllerId) -> Option<&ControllerRecord> {
        self.live.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ControllerId) -> Option<&mut ControllerRecord> {
        self.live.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ControllerId) -> Option<ControllerRecord> {
        self.live.remove(&id)
    }

    pub(crate) fn is_live(&self, id: ControllerId) -> bool {
        self.live.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }
}

impl Binder {
    /// Build a controller of `class_name`, optionally bound to an element
    /// and seeded with injected property values.
    ///
    /// With an element: the element is snapshotted, its type marker set if
    /// absent, and its attributes coerced against the declared parameter
    /// table. With injected values: the full parameter table counts as
    /// bound, and the injected values overwrite any attribute-sourced
    /// ones. Attachment to the element map is the caller's job.
    pub(crate) fn construct_controller(
        &mut self,
        class_name: &str,
        element: Option<Id>,
        params: Rc<BTreeMap<String, TypeTag>>,
        injected: Option<BTreeMap<String, Value>>,
    ) -> Result<ControllerId, BinderError> {
        let mut snapshot = None;
        let mut raw_attrs: Vec<(String, TypeTag, String)> = Vec::new();

        if let Some(element_id) = element {
            let node = traverse::find_node_mut(&mut self.document, element_id).ok_or_else(
                || BinderError::Configuration(format!("element {element_id:?} not found")),
            )?;
            if !node.is_element() {
                return Err(BinderError::Configuration(format!(
                    "node {element_id:?} is not an element"
                )));
            }
            if node.has_attr(BIND_ATTR) || node.has_attr(GROUP_ATTR) {
                return Err(BinderError::Configuration(format!(
                    "element {element_id:?} mixes {TYPE_ATTR} with {BIND_ATTR} or {GROUP_ATTR}"
                )));
            }
            // Snapshot before the marker is stamped, so restoration hands
            // back the markup exactly as authored.
            snapshot = Some(Box::new(node.clone()));
            if node.attr(TYPE_ATTR).is_none() {
                node.set_attr(TYPE_ATTR, class_name);
            }
            for (name, tag) in params.iter() {
                if let Some(raw) = node.attr(name) {
                    raw_attrs.push((name.clone(), *tag, raw.to_string()));
                }
            }
        }

        let mut properties = BTreeMap::new();
        let mut bound = BTreeMap::new();
        for (name, tag, raw) in raw_attrs {
            let value = coerce(&raw, tag, &self.config.base_url);
            bound.insert(name.clone(), tag);
            properties.insert(name, value);
        }

        if let Some(injected) = injected {
            // An injection pass binds the whole declared table, whether or
            // not every parameter received a value.
            bound = params.as_ref().clone();
            for (name, value) in injected {
                properties.insert(name, value);
            }
        }

        let built = self.registry.construct(class_name, &mut self.views)?;

        let id = self.controllers.insert(ControllerRecord {
            class_name: class_name.to_string(),
            view: built.view,
            root_element: element,
            params,
            bound,
            properties,
            parent: None,
            delegates: Vec::new(),
            original_snapshot: snapshot,
        });
        log::debug!(
            target: "binder.controller",
            "constructed {id:?} ({class_name}) on {element:?}"
        );

        if self.config.instrumented {
            self.publish(id, topics::CONTROLLER_CREATED, Vec::new())?;
        }
        Ok(id)
    }

    /// Hang a delegate off `parent`. The delegate shares the parent's
    /// declared parameter table; with `inject_data` it also starts from a
    /// copy of the parent's current bound-property values.
    pub fn create_delegate(
        &mut self,
        parent: ControllerId,
        spec: DelegateSpec,
    ) -> Result<Option<ControllerId>, BinderError> {
        let Some(class_name) = spec.class_name else {
            return Ok(None);
        };
        // An element-bound delegate occupies its element like any other
        // controller; refuse a slot that is already taken.
        if let Some(element) = spec.element {
            if let Some(existing) = self.attached.get(&element) {
                return Err(BinderError::Configuration(format!(
                    "element {element:?} already bound to {existing:?}"
                )));
            }
        }
        let parent_record = self.controllers.get(parent).ok_or_else(|| {
            BinderError::Configuration(format!("unknown controller {parent:?}"))
        })?;

        let params = Rc::clone(&parent_record.params);
        let mut injected = BTreeMap::new();
        if spec.inject_data {
            // A snapshot copy: later mutation of the parent's properties
            // does not reach the delegate.
            for name in parent_record.bound.keys() {
                if let Some(value) = parent_record.properties.get(name) {
                    injected.insert(name.clone(), value.clone());
                }
            }
        }

        let delegate =
            self.construct_controller(&class_name, spec.element, params, Some(injected))?;
        if let Some(element) = spec.element {
            self.attached.insert(element, delegate);
        }

        let record = self
            .controllers
            .get_mut(delegate)
            .expect("freshly constructed controller is live");
        record.parent = Some(parent);
        self.controllers
            .get_mut(parent)
            .expect("parent checked live above")
            .delegates
            .push(delegate);
        log::debug!(
            target: "binder.controller",
            "delegate {delegate:?} attached under {parent:?}"
        );
        Ok(Some(delegate))
    }

    /// Detach `delegate` from `parent` without destroying it. Severs both
    /// directions of the link; returns the detached id, or `None` if the
    /// delegate was not in the parent's list.
    pub fn splice_delegate(
        &mut self,
        parent: ControllerId,
        delegate: ControllerId,
    ) -> Option<ControllerId> {
        let record = self.controllers.get_mut(parent)?;
        let index = record.delegates.iter().position(|d| *d == delegate)?;
        let removed = record.delegates.remove(index);
        if let Some(detached) = self.controllers.get_mut(removed) {
            detached.parent = None;
        }
        Some(removed)
    }

    /// Detach `delegate` from `parent`, then destroy it.
    pub fn delete_delegate(
        &mut self,
        parent: ControllerId,
        delegate: ControllerId,
    ) -> Result<(), BinderError> {
        self.splice_delegate(parent, delegate);
        self.destroy(delegate)
    }

    /// Tear a controller down: delegates first (recursively, always from
    /// the front of the list), then its view, then every engine reference
    /// to it.
    pub fn destroy(&mut self, id: ControllerId) -> Result<(), BinderError> {
        if !self.controllers.is_live(id) {
            return Err(BinderError::Configuration(format!(
                "destroy of unknown controller {id:?}"
            )));
        }

        loop {
            let first = self
                .controllers
                .get(id)
                .and_then(|record| record.delegates.first().copied());
            let Some(first) = first else { break };
            self.delete_delegate(id, first)?;
        }

        // Free every engine reference first; the record is unusable from
        // here even when the view contract turns out violated below.
        let record = self.controllers.remove(id).expect("liveness checked above");
        if let Some(parent) = record.parent {
            if let Some(parent_record) = self.controllers.get_mut(parent) {
                parent_record.delegates.retain(|d| *d != id);
            }
        }
        if let Some(element) = record.root_element {
            if self.attached.get(&element) == Some(&id) {
                self.attached.remove(&element);
            }
        }
        self.bus.remove_subscriber(id);

        let Some(view) = record.view else {
            return Err(BinderError::ViewMissing { controller: id });
        };
        self.views.destroy(view);
        log::debug!(target: "binder.controller", "destroyed {id:?}");
        Ok(())
    }
}
