//! Handle-like payloads: host objects and native callables

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;
use crate::invoke::{Host, Invoker};

/// Type alias for native handlers to reduce complexity.
///
/// A handler returns `Ok(None)` for "no return value" and `Err(exception)`
/// to raise an exception in the host.
pub type NativeHandler = Rc<dyn Fn(&mut Invocation<'_>) -> Result<Option<Value>, Value>>;

/// The arguments and environment of one native call.
pub struct Invocation<'a> {
    host: &'a dyn Host,
    this: Option<&'a Value>,
    args: &'a mut [Value],
}

impl<'a> Invocation<'a> {
    /// Bundle a call for a handler.
    pub fn new(host: &'a dyn Host, this: Option<&'a Value>, args: &'a mut [Value]) -> Self {
        Self { host, this, args }
    }

    /// The host that dispatched the call.
    pub fn host(&self) -> &'a dyn Host {
        self.host
    }

    /// An invoker for calls back into the host.
    pub fn invoker(&self) -> Invoker<'a> {
        Invoker::new(self.host)
    }

    /// The receiver of a method call.
    pub fn this(&self) -> Option<&Value> {
        self.this
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the call has no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// A handle on argument `index`, or null if it was not passed.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).map(Value::share).unwrap_or_default()
    }

    /// Mutable access to argument `index`.
    ///
    /// Assigning through an argument that the caller passed as an alias
    /// updates the caller's variable.
    pub fn arg_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.args.get_mut(index)
    }

    /// All positional arguments.
    pub fn args(&self) -> &[Value] {
        self.args
    }
}

/// A host object.
///
/// Objects are handles: every value holding an object refers to the same
/// instance, and property writes are visible through all of them.
pub struct Object {
    class: String,
    properties: RefCell<IndexMap<String, Value>>,
}

impl Object {
    /// Create an object of `class` with no properties.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: RefCell::new(IndexMap::new()),
        }
    }

    /// The object's class name.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// A handle on a property, or null if it is not set.
    pub fn property(&self, name: &str) -> Value {
        self.properties
            .borrow()
            .get(name)
            .map(Value::share)
            .unwrap_or_default()
    }

    /// Check whether a property is set.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.borrow().contains_key(name)
    }

    /// Set a property, sharing the value's payload.
    ///
    /// An object stored in its own property keeps itself alive.
    pub fn set_property(&self, name: impl Into<String>, value: &Value) {
        let replaced = self
            .properties
            .borrow_mut()
            .insert(name.into(), value.share());
        drop(replaced);
    }

    /// Number of properties.
    pub fn property_count(&self) -> usize {
        self.properties.borrow().len()
    }

    /// Snapshot of all properties in definition order.
    pub fn properties(&self) -> Vec<(String, Value)> {
        self.properties
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.share()))
            .collect()
    }
}

/// A native callable value (a closure in host terms).
#[derive(Clone)]
pub struct Callable {
    name: Rc<str>,
    handler: NativeHandler,
}

impl Callable {
    /// Wrap a handler as a callable.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Option<Value>, Value> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            handler: Rc::new(handler),
        }
    }

    /// Wrap an existing handler.
    pub fn from_handler(name: impl Into<String>, handler: NativeHandler) -> Self {
        Self {
            name: Rc::from(name.into()),
            handler,
        }
    }

    /// Name shown in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The native handler.
    pub fn handler(&self) -> &NativeHandler {
        &self.handler
    }

    /// Whether both callables wrap the same handler.
    pub fn same_handler(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}
