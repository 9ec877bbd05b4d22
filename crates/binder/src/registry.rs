//! Class registry: explicit name-to-factory mapping with memoized
//! parameter descriptors, plus the function registry backing
//! function-tagged attributes.
//!
//! Classes are registered up front as data (name, declared parameter
//! defaults, factory). There is no runtime name resolution into a global
//! namespace: an unregistered name is a `Resolution` error.

use crate::error::BinderError;
use crate::id::ViewId;
use crate::value::{FuncRef, TypeTag, Value, infer_type};
use crate::view::Views;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// What a factory hands back to the engine.
///
/// Every well-behaved class installs a view; a `None` view is a contract
/// violation that surfaces as `ViewMissing` when the controller is
/// destroyed.
#[derive(Debug)]
pub struct BuiltController {
    pub view: Option<ViewId>,
}

pub type Factory = Box<dyn Fn(&mut Views) -> Result<BuiltController, String>>;

/// A registered controller class: its name, the declared-schema defaults
/// its bindable parameters are inferred from, and its factory.
pub struct ClassSpec {
    pub name: String,
    pub defaults: Vec<(String, Value)>,
    pub factory: Factory,
}

/// Declared binding shape of a class, built once per class name.
///
/// The parameter table is shared: controller records hold it by `Rc` and
/// delegates inherit their parent's copy.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDescriptor {
    pub class_name: String,
    pub params: Rc<BTreeMap<String, TypeTag>>,
}

/// Internal-convention prefix: parameters starting with this are not
/// bindable from markup.
const INTERNAL_PREFIX: char = '_';

#[derive(Default)]
pub(crate) struct Registry {
    classes: HashMap<String, ClassSpec>,
    // Descriptor cache, keyed by exact class-name string. Append-only in
    // steady state; the one sanctioned invalidation is re-registration of
    // the same class name, which drops the stale entry (see `register`).
    descriptors: HashMap<String, Rc<ClassDescriptor>>,
    introspections: u64,
    functions: HashMap<String, Rc<dyn Fn(&[Value])>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a class. Re-registering an existing name replaces its
    /// factory and drops the memoized descriptor, so the next resolution
    /// re-introspects the new defaults.
    pub(crate) fn register(&mut self, spec: ClassSpec) {
        if self.classes.contains_key(&spec.name) {
            log::warn!(
                target: "binder.registry",
                "re-registering controller class '{}'", spec.name
            );
            self.descriptors.remove(&spec.name);
        }
        self.classes.insert(spec.name.clone(), spec);
    }

    pub(crate) fn is_registered(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Resolve a class name to its descriptor, memoized per exact name.
    pub(crate) fn resolve(&mut self, class_name: &str) -> Result<Rc<ClassDescriptor>, BinderError> {
        if let Some(descriptor) = self.descriptors.get(class_name) {
            return Ok(Rc::clone(descriptor));
        }
        let spec = self
            .classes
            .get(class_name)
            .ok_or_else(|| BinderError::Resolution {
                class_name: class_name.to_string(),
            })?;

        self.introspections += 1;
        let mut params = BTreeMap::new();
        for (name, default) in &spec.defaults {
            if name.starts_with(INTERNAL_PREFIX) {
                continue;
            }
            let tag = infer_type(default);
            // Callable members are behavior, not bindable state.
            if tag == TypeTag::Function {
                continue;
            }
            params.insert(name.clone(), tag);
        }

        let descriptor = Rc::new(ClassDescriptor {
            class_name: class_name.to_string(),
            params: Rc::new(params),
        });
        self.descriptors
            .insert(class_name.to_string(), Rc::clone(&descriptor));
        log::debug!(
            target: "binder.registry",
            "built descriptor for '{class_name}' ({} bindable params)",
            descriptor.params.len()
        );
        Ok(descriptor)
    }

    /// How many descriptors have been built from scratch. Repeated
    /// resolution of the same name must not move this counter.
    pub(crate) fn introspections(&self) -> u64 {
        self.introspections
    }

    /// Run the class's factory.
    pub(crate) fn construct(
        &self,
        class_name: &str,
        views: &mut Views,
    ) -> Result<BuiltController, BinderError> {
        let spec = self
            .classes
            .get(class_name)
            .ok_or_else(|| BinderError::Resolution {
                class_name: class_name.to_string(),
            })?;
        (spec.factory)(views).map_err(|cause| BinderError::Binding {
            class_name: class_name.to_string(),
            cause,
        })
    }

    pub(crate) fn register_function(&mut self, name: &str, f: Rc<dyn Fn(&[Value])>) {
        self.functions.insert(name.to_string(), f);
    }

    /// Invoke a function reference. Unresolved names and no-op references
    /// do nothing; this mirrors coercion's never-fail policy.
    pub(crate) fn call(&self, func: &FuncRef, args: &[Value]) {
        let Some(name) = func.name() else {
            return;
        };
        match self.functions.get(name) {
            Some(f) => f(args),
            None => {
                log::debug!(target: "binder.registry", "function '{name}' not registered, no-op");
            }
        }
    }
}
