//! Dynamic call dispatch into the host
//!
//! The host is an opaque collaborator reached through the [`Host`] trait. A
//! call either treats a value as the callable itself, or builds a
//! `[receiver, method-name]` descriptor and submits it to the same call
//! primitive. The host's exception marker is sampled around every call, and a
//! change is turned into [`ValueError::HostException`].

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::context::CallContext;
use crate::error::{Result, ValueError};
use crate::registry::TypeHint;
use crate::value::{Kind, Value};

/// Why the host could not perform a call.
///
/// These are not errors for the caller: the invoker turns every one of them
/// into a null result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The target does not name anything callable
    #[error("value of kind {kind} is not callable")]
    NotCallable {
        /// Kind of the target
        kind: Kind,
    },

    /// No function with this name is registered
    #[error("call to undefined function {name}()")]
    UnknownFunction {
        /// The requested name
        name: String,
    },

    /// The receiver's class has no such method
    #[error("call to undefined method {class}::{method}()")]
    NoSuchMethod {
        /// The receiver's class
        class: String,
        /// The requested method
        method: String,
    },

    /// The argument count is outside the declared range
    #[error("{name}() expects {min} to {max} arguments, {got} given")]
    ArityMismatch {
        /// Function name
        name: String,
        /// Minimum accepted
        min: usize,
        /// Maximum accepted
        max: usize,
        /// Number passed
        got: usize,
    },

    /// An argument does not satisfy its parameter's type hint
    #[error("{name}() expects argument {position} to be {expected}, {given} given")]
    TypeMismatch {
        /// Function name
        name: String,
        /// One-based argument position
        position: usize,
        /// The declared type
        expected: TypeHint,
        /// Kind of the argument passed
        given: Kind,
    },

    /// More arguments than the call context allows
    #[error("{got} arguments exceed the limit of {max}")]
    TooManyArguments {
        /// Number passed
        got: usize,
        /// Configured limit
        max: usize,
    },
}

/// The host runtime boundary.
pub trait Host {
    /// Call `target` with positional arguments.
    ///
    /// `target` is either a plain callable (a callable value, a function
    /// name, an invocable object) or a two-element `[receiver, method]`
    /// array. An exception raised by the callee is reported through
    /// [`Host::exception`], not through the return value.
    fn call(&self, target: &Value, args: &mut [Value])
        -> std::result::Result<Option<Value>, CallFailure>;

    /// The current exception marker.
    fn exception(&self) -> Option<Value>;

    /// Take the pending exception, leaving none. This is how native code
    /// catches an exception raised by a call it made.
    fn clear_exception(&self) -> Option<Value>;

    /// Whether `target` resolves to something callable.
    fn is_callable(&self, target: &Value) -> bool;

    /// Dispatch settings.
    fn context(&self) -> CallContext {
        CallContext::default()
    }
}

/// Build the `[receiver, method]` descriptor for a method call.
pub fn method_descriptor(receiver: &Value, method: &str) -> Value {
    let mut descriptor = Value::array();
    descriptor.set(0, receiver);
    descriptor.set(1, &Value::from(method));
    descriptor
}

/// Dispatches values as calls into a [`Host`].
///
/// # Example
///
/// ```
/// use hostvalue::{Invoker, Runtime, Value};
///
/// let rt = Runtime::with_prelude();
/// let invoker = Invoker::new(&rt);
///
/// let len = invoker.call(&Value::from("strlen"), &[Value::from("hello")]).unwrap();
/// assert_eq!(len.int_value(), 5);
/// ```
pub struct Invoker<'h> {
    host: &'h dyn Host,
    ctx: CallContext,
}

impl<'h> Invoker<'h> {
    /// Create an invoker using the host's own call context.
    pub fn new(host: &'h dyn Host) -> Self {
        Self {
            host,
            ctx: host.context(),
        }
    }

    /// Create an invoker with an explicit call context.
    pub fn with_context(host: &'h dyn Host, ctx: CallContext) -> Self {
        Self { host, ctx }
    }

    /// The context this invoker dispatches with.
    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Call `callable` with `args`.
    ///
    /// Arguments are passed as handles on the caller's payloads: an argument
    /// that is part of an alias group may be assigned by the callee, any
    /// other argument forks on the callee's first write.
    ///
    /// # Errors
    ///
    /// Returns `HostException` if the host raised an exception during the
    /// call. A target that cannot be called yields `Ok` with a null value.
    pub fn call(&self, callable: &Value, args: &[Value]) -> Result<Value> {
        self.dispatch(callable, args)
    }

    /// Call method `method` on `receiver` with `args`.
    ///
    /// # Errors
    ///
    /// As for [`Invoker::call`]; an unknown method yields a null value.
    pub fn call_method(&self, receiver: &Value, method: &str, args: &[Value]) -> Result<Value> {
        let descriptor = method_descriptor(receiver, method);
        self.dispatch(&descriptor, args)
    }

    /// Whether the host can call `value`. Strings may name functions.
    pub fn is_callable(&self, value: &Value) -> bool {
        self.host.is_callable(value)
    }

    /// Cast a value to a string through the host.
    ///
    /// Objects with a `__toString` method are cast by calling it. Every
    /// other value uses the scalar conversion table.
    ///
    /// # Errors
    ///
    /// Returns `HostException` if `__toString` raised, and `Conversion` if an
    /// object has no way to become a string.
    pub fn stringify(&self, value: &Value) -> Result<String> {
        if !value.is_object() {
            return Ok(value.string_value());
        }

        let descriptor = method_descriptor(value, "__toString");
        if !self.host.is_callable(&descriptor) {
            return Err(ValueError::Conversion {
                from: Kind::Object,
                to: Kind::String,
            });
        }
        Ok(self.dispatch(&descriptor, &[])?.string_value())
    }

    fn dispatch(&self, target: &Value, args: &[Value]) -> Result<Value> {
        if !self.ctx.accepts_args(args.len()) {
            let failure = CallFailure::TooManyArguments {
                got: args.len(),
                max: self.ctx.max_args,
            };
            warn!(%failure, "call rejected");
            return Ok(Value::null());
        }

        let mut params: Vec<Value> = args.iter().map(Value::share).collect();
        let before = self.host.exception();
        trace!(target = ?target, argc = params.len(), "dispatching host call");

        let returned = match self.host.call(target, &mut params) {
            Ok(returned) => returned,
            Err(failure) => {
                debug!(%failure, "host call failed, returning null");
                return Ok(Value::null());
            }
        };

        let after = self.host.exception();
        if let Some(exception) = raised(before.as_ref(), after) {
            debug!(exception = ?exception, "host raised an exception");
            return Err(ValueError::HostException { exception });
        }

        Ok(returned.unwrap_or_default())
    }
}

/// The exception raised between two marker samples, if any.
fn raised(before: Option<&Value>, after: Option<Value>) -> Option<Value> {
    let after = after?;
    match before {
        Some(previous) if previous.same_payload(&after) => None,
        _ => Some(after),
    }
}

impl Value {
    /// Call this value through `host`.
    ///
    /// # Errors
    ///
    /// Returns `HostException` if the host raised an exception.
    pub fn invoke(&self, host: &dyn Host, args: &[Value]) -> Result<Value> {
        Invoker::new(host).call(self, args)
    }

    /// Call method `method` on this value through `host`.
    ///
    /// # Errors
    ///
    /// Returns `HostException` if the host raised an exception.
    pub fn call_method(&self, host: &dyn Host, method: &str, args: &[Value]) -> Result<Value> {
        Invoker::new(host).call_method(self, method, args)
    }
}
