//! The binding engine: owns the markup tree, the class registry, the
//! controller arena, and the element-to-controller attachment table.
//!
//! Operations on `Binder` are split by concern: lifecycle in
//! `controller`, tree scanning in `parse`, placement in `place`, event
//! routing in `route`. This module holds the struct, construction, and
//! the read-side accessors.

use crate::bus::{Bus, SubscriptionCache};
use crate::controller::Controllers;
use crate::error::BinderError;
use crate::history::TravelRegistry;
use crate::id::{ControllerId, ViewId};
use crate::registry::{ClassDescriptor, ClassSpec, Registry};
use crate::value::{FuncRef, TypeTag, Value};
use crate::view::Views;
use markup::{Id, Node, NodeId, parse_fragment, traverse};
use std::collections::HashMap;
use std::rc::Rc;

/// Marker attribute naming the controller class to instantiate.
pub const TYPE_ATTR: &str = "data-controller";
/// Reserved for single-property bindings; mutually exclusive with
/// [`TYPE_ATTR`] on one element.
pub const BIND_ATTR: &str = "data-bind";
/// Reserved for binding groups; mutually exclusive with [`TYPE_ATTR`] on
/// one element.
pub const GROUP_ATTR: &str = "data-group";

#[derive(Default)]
pub struct BinderConfig {
    /// Prefix for url-typed attribute coercion.
    pub base_url: String,
    /// Publish a creation event for every constructed controller.
    pub instrumented: bool,
}

pub struct Binder {
    pub(crate) config: BinderConfig,
    pub(crate) document: Node,
    pub(crate) next_node_id: NodeId,
    pub(crate) registry: Registry,
    pub(crate) controllers: Controllers,
    /// Element-to-controller attachment table. Controller identity never
    /// lives on the node itself.
    pub(crate) attached: HashMap<Id, ControllerId>,
    pub(crate) views: Views,
    pub(crate) bus: Bus,
    pub(crate) cache: SubscriptionCache,
    pub(crate) travel: TravelRegistry,
}

impl Binder {
    pub fn new(markup_text: &str) -> Self {
        Self::with_config(markup_text, BinderConfig::default())
    }

    pub fn with_config(markup_text: &str, config: BinderConfig) -> Self {
        let mut document = parse_fragment(markup_text);
        let mut next_node_id: NodeId = 0;
        traverse::assign_node_ids(&mut document, &mut next_node_id);
        Self {
            config,
            document,
            next_node_id,
            registry: Registry::new(),
            controllers: Controllers::default(),
            attached: HashMap::new(),
            views: Views::new(),
            bus: Bus::new(),
            cache: SubscriptionCache::default(),
            travel: TravelRegistry::default(),
        }
    }

    // --- registry surface ---

    pub fn register_class(&mut self, spec: ClassSpec) {
        self.registry.register(spec);
    }

    pub fn is_registered(&self, class_name: &str) -> bool {
        self.registry.is_registered(class_name)
    }

    /// Resolve a class name to its memoized parameter descriptor.
    pub fn descriptor(&mut self, class_name: &str) -> Result<Rc<ClassDescriptor>, BinderError> {
        self.registry.resolve(class_name)
    }

    /// Count of descriptors built from scratch so far.
    pub fn introspections(&self) -> u64 {
        self.registry.introspections()
    }

    pub fn register_function(&mut self, name: &str, f: impl Fn(&[Value]) + 'static) {
        self.registry.register_function(name, Rc::new(f));
    }

    /// Invoke a coerced function reference; unknown names are a no-op.
    pub fn call_function(&self, func: &FuncRef, args: &[Value]) {
        self.registry.call(func, args);
    }

    // --- tree surface ---

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn element_by_html_id(&self, html_id: &str) -> Option<Id> {
        traverse::find_by_html_id(&self.document, html_id)
    }

    // --- controller accessors ---

    pub fn controller_at(&self, element: Id) -> Option<ControllerId> {
        self.attached.get(&element).copied()
    }

    pub fn is_live(&self, id: ControllerId) -> bool {
        self.controllers.is_live(id)
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    pub fn class_name_of(&self, id: ControllerId) -> Option<&str> {
        self.controllers.get(id).map(|r| r.class_name.as_str())
    }

    pub fn view_of(&self, id: ControllerId) -> Option<ViewId> {
        self.controllers.get(id).and_then(|r| r.view)
    }

    pub fn view_is_live(&self, view: ViewId) -> bool {
        self.views.is_live(view)
    }

    pub fn parent_of(&self, id: ControllerId) -> Option<ControllerId> {
        self.controllers.get(id).and_then(|r| r.parent)
    }

    pub fn delegates_of(&self, id: ControllerId) -> &[ControllerId] {
        self.controllers
            .get(id)
            .map(|r| r.delegates.as_slice())
            .unwrap_or(&[])
    }

    pub fn root_element_of(&self, id: ControllerId) -> Option<Id> {
        self.controllers.get(id).and_then(|r| r.root_element)
    }

    /// Current value of a bound property.
    pub fn property(&self, id: ControllerId, name: &str) -> Option<&Value> {
        self.controllers.get(id).and_then(|r| r.properties.get(name))
    }

    pub fn set_property(
        &mut self,
        id: ControllerId,
        name: &str,
        value: Value,
    ) -> Result<(), BinderError> {
        let record = self.controllers.get_mut(id).ok_or_else(|| {
            BinderError::Configuration(format!("unknown controller {id:?}"))
        })?;
        record.properties.insert(name.to_string(), value);
        Ok(())
    }

    /// Names of the parameters that actually received a value, with their
    /// declared types.
    pub fn bound_param_names(&self, id: ControllerId) -> Vec<(String, TypeTag)> {
        self.controllers
            .get(id)
            .map(|r| r.bound.iter().map(|(n, t)| (n.clone(), *t)).collect())
            .unwrap_or_default()
    }

    /// Pre-binding snapshot of the controller's root element.
    pub fn snapshot_of(&self, id: ControllerId) -> Option<&Node> {
        self.controllers
            .get(id)
            .and_then(|r| r.original_snapshot.as_deref())
    }
}
