//! In-process host runtime
//!
//! [`Runtime`] implements the [`Host`] boundary without an external
//! interpreter: a function table, a class table with native methods, an
//! exception slot and a call depth limit. It is what the embedding's tests
//! and tools dispatch against.

mod guard;
mod prelude;

pub use guard::CallGuard;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::context::CallContext;
use crate::error::Result;
use crate::invoke::{method_descriptor, CallFailure, Host, Invoker};
use crate::registry::{FunctionEntry, NativeFunction};
use crate::value::{ArrayKey, Callable, Invocation, Kind, NativeHandler, Payload, Value};

/// Class of the exceptions built by [`Runtime::new_exception`].
pub const EXCEPTION_CLASS: &str = "Exception";

/// A class and its native methods, keyed by lowercase method name.
#[derive(Debug)]
struct Class {
    name: String,
    methods: IndexMap<String, FunctionEntry>,
}

/// What a call target resolved to.
enum Target {
    Closure(Callable),
    Function(FunctionEntry),
    Method {
        entry: FunctionEntry,
        this: Option<Value>,
    },
}

/// An in-process host.
///
/// Function and class names are case-insensitive, as in the host language.
///
/// # Example
///
/// ```
/// use hostvalue::{NativeFunction, Runtime, Value};
///
/// let rt = Runtime::new();
/// rt.register(NativeFunction::new("answer", |_| Ok(Some(Value::from(42)))));
///
/// let result = Value::from("ANSWER").invoke(&rt, &[]).unwrap();
/// assert_eq!(result.int_value(), 42);
/// ```
pub struct Runtime {
    functions: RefCell<IndexMap<String, FunctionEntry>>,
    classes: RefCell<IndexMap<String, Class>>,
    exception: RefCell<Option<Value>>,
    depth: Cell<usize>,
    ctx: CallContext,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create an empty runtime with default limits.
    pub fn new() -> Self {
        Self::with_context(CallContext::default())
    }

    /// Create an empty runtime with the given limits.
    pub fn with_context(ctx: CallContext) -> Self {
        Self {
            functions: RefCell::new(IndexMap::new()),
            classes: RefCell::new(IndexMap::new()),
            exception: RefCell::new(None),
            depth: Cell::new(0),
            ctx,
        }
    }

    /// Register a native function, or a method if it names a class.
    ///
    /// Registering a method creates its class on first use. A later
    /// registration under the same name replaces the earlier one.
    pub fn register(&self, function: NativeFunction) {
        let entry = function.to_entry();
        debug!(name = %entry.display_name(), "registering native function");

        match function.class_name() {
            Some(class) => {
                let mut classes = self.classes.borrow_mut();
                let slot = classes
                    .entry(class.to_ascii_lowercase())
                    .or_insert_with(|| Class {
                        name: class.to_string(),
                        methods: IndexMap::new(),
                    });
                slot.methods.insert(entry.name.to_ascii_lowercase(), entry);
            }
            None => {
                self.functions
                    .borrow_mut()
                    .insert(entry.name.to_ascii_lowercase(), entry);
            }
        }
    }

    /// Declare a class with no methods. Returns false if it already exists.
    pub fn define_class(&self, name: &str) -> bool {
        let mut classes = self.classes.borrow_mut();
        let key = name.to_ascii_lowercase();
        if classes.contains_key(&key) {
            return false;
        }
        classes.insert(
            key,
            Class {
                name: name.to_string(),
                methods: IndexMap::new(),
            },
        );
        true
    }

    /// Check whether a function is registered.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions
            .borrow()
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Check whether a class is declared.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.borrow().contains_key(&name.to_ascii_lowercase())
    }

    /// Names of all registered functions, in registration order.
    pub fn function_names(&self) -> Vec<String> {
        self.functions
            .borrow()
            .values()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Create an instance of `class`, running its `__construct` if it has one.
    ///
    /// An unknown class yields null.
    ///
    /// # Errors
    ///
    /// Returns `HostException` if the constructor raised.
    pub fn instantiate(&self, class: &str, args: &[Value]) -> Result<Value> {
        let name = match self.classes.borrow().get(&class.to_ascii_lowercase()) {
            Some(declared) => declared.name.clone(),
            None => {
                debug!(class, "instantiating unknown class");
                return Ok(Value::null());
            }
        };

        let object = Value::object(name);
        let constructor = method_descriptor(&object, "__construct");
        if self.is_callable(&constructor) {
            Invoker::new(self).call(&constructor, args)?;
        }
        Ok(object)
    }

    /// Raise `exception`, replacing any pending one.
    pub fn throw(&self, exception: impl Into<Value>) {
        let exception = exception.into();
        debug!(exception = ?exception, "exception raised");
        let previous = self.exception.borrow_mut().replace(exception);
        drop(previous);
    }

    /// Build an exception object carrying `message`.
    pub fn new_exception(&self, message: impl Into<String>) -> Value {
        let exception = Value::object(EXCEPTION_CLASS);
        if let Some(object) = exception.as_object() {
            object.set_property("message", &Value::from(message.into()));
        }
        exception
    }

    /// The call limits this runtime enforces.
    pub fn call_context(&self) -> &CallContext {
        &self.ctx
    }

    fn resolve(&self, target: &Value) -> std::result::Result<Target, CallFailure> {
        match &*target.payload() {
            Payload::Callable(callable) => Ok(Target::Closure(callable.clone())),
            Payload::String(bytes) => {
                let name = String::from_utf8_lossy(bytes);
                match name.split_once("::") {
                    Some((class, method)) => self.method(class, method, None),
                    None => self.function(&name),
                }
            }
            Payload::Array(items) if items.len() == 2 => {
                let receiver = items.get(&ArrayKey::Int(0));
                let method = items.get(&ArrayKey::Int(1));
                let (Some(receiver), Some(method)) = (receiver, method) else {
                    return Err(CallFailure::NotCallable { kind: Kind::Array });
                };
                if !method.is_string() {
                    return Err(CallFailure::NotCallable { kind: Kind::Array });
                }

                let method = method.string_value();
                match receiver.as_object() {
                    Some(object) => self.method(object.class_name(), &method, Some(receiver.share())),
                    None if receiver.is_string() => {
                        self.method(&receiver.string_value(), &method, None)
                    }
                    None => Err(CallFailure::NotCallable { kind: Kind::Array }),
                }
            }
            Payload::Object(object) => self
                .method(object.class_name(), "__invoke", Some(target.share()))
                .map_err(|_| CallFailure::NotCallable { kind: Kind::Object }),
            other => Err(CallFailure::NotCallable { kind: other.kind() }),
        }
    }

    fn function(&self, name: &str) -> std::result::Result<Target, CallFailure> {
        self.functions
            .borrow()
            .get(&name.to_ascii_lowercase())
            .cloned()
            .map(Target::Function)
            .ok_or_else(|| CallFailure::UnknownFunction {
                name: name.to_string(),
            })
    }

    fn method(
        &self,
        class: &str,
        method: &str,
        this: Option<Value>,
    ) -> std::result::Result<Target, CallFailure> {
        let entry = self
            .classes
            .borrow()
            .get(&class.to_ascii_lowercase())
            .and_then(|declared| declared.methods.get(&method.to_ascii_lowercase()))
            .cloned()
            .ok_or_else(|| CallFailure::NoSuchMethod {
                class: class.to_string(),
                method: method.to_string(),
            })?;

        // Static methods run without a receiver even when called on one
        let this = if entry.flags.is_static { None } else { this };
        Ok(Target::Method { entry, this })
    }
}

impl Runtime {
    fn check_arguments(
        &self,
        entry: &FunctionEntry,
        args: &[Value],
    ) -> std::result::Result<(), CallFailure> {
        entry.check_arity(args.len())?;
        entry.check_types(args, self)?;

        for (index, arg) in args.iter().enumerate() {
            if entry.passes_by_ref(index) && !arg.is_alias() {
                debug!(
                    function = %entry.display_name(),
                    position = index + 1,
                    "by-reference parameter received a plain value"
                );
            }
        }
        Ok(())
    }
}

fn handler_of(entry: &FunctionEntry) -> std::result::Result<NativeHandler, CallFailure> {
    entry
        .handler
        .clone()
        .ok_or_else(|| CallFailure::UnknownFunction {
            name: entry.display_name(),
        })
}

impl Host for Runtime {
    fn call(
        &self,
        target: &Value,
        args: &mut [Value],
    ) -> std::result::Result<Option<Value>, CallFailure> {
        let (handler, this) = match self.resolve(target)? {
            Target::Closure(callable) => (Rc::clone(callable.handler()), None),
            Target::Function(entry) => {
                self.check_arguments(&entry, args)?;
                (handler_of(&entry)?, None)
            }
            Target::Method { entry, this } => {
                self.check_arguments(&entry, args)?;
                (handler_of(&entry)?, this)
            }
        };

        let Some(_guard) = self.enter_call() else {
            warn!(depth = self.depth(), "call depth limit reached");
            self.throw(format!(
                "Maximum call depth of {} reached",
                self.ctx.max_call_depth
            ));
            return Ok(None);
        };

        trace!(depth = self.depth(), argc = args.len(), "running native handler");
        let mut call = Invocation::new(self, this.as_ref(), args);
        match (*handler)(&mut call) {
            Ok(returned) => Ok(returned),
            Err(exception) => {
                self.throw(exception);
                Ok(None)
            }
        }
    }

    fn exception(&self) -> Option<Value> {
        self.exception.borrow().as_ref().map(Value::share)
    }

    fn clear_exception(&self) -> Option<Value> {
        self.exception.borrow_mut().take()
    }

    fn is_callable(&self, target: &Value) -> bool {
        self.resolve(target).is_ok()
    }

    fn context(&self) -> CallContext {
        self.ctx
    }
}
