//! # hostvalue
//!
//! Dynamic values for native code embedded in a scripting host.
//!
//! A [`Value`] is an owning handle on a reference-counted, copy-on-write
//! payload. Copies share storage until one of them writes; variables bound
//! as an alias group share one payload and observe each other's writes.
//! Values coerce lazily between kinds, index as ordered arrays, take part in
//! host-style arithmetic, and can be called through a [`Host`].
//!
//! ## Architecture
//!
//! - **Value layer**: `SharedValue` cells, `Value` handles, coercion, containers
//! - **Arithmetic**: one policy for `+ - * /`, integer-only modulo
//! - **Invoker**: calls into the host with exception bridging
//! - **Registry**: descriptors for registering native functions
//! - **Runtime**: an in-process host for tests and tools
//!
//! Values are single-threaded: a `Value` is neither `Send` nor `Sync`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod context;
pub mod error;
pub mod invoke;
pub mod registry;
pub mod runtime;
pub mod value;

// Re-export main types
pub use arithmetic::{remainder, Arithmetic, Divide, Minus, Multiply, Operand, Operator, Plus};
pub use context::CallContext;
pub use error::{type_name, Result, ValueError};
pub use invoke::{method_descriptor, CallFailure, Host, Invoker};
pub use registry::{ArgInfo, FunctionEntry, FunctionFlags, NativeFunction, TypeHint};
pub use runtime::{CallGuard, Runtime, EXCEPTION_CLASS};
pub use value::{
    Array, ArrayKey, Callable, Invocation, Kind, Member, NativeHandler, Number, Object, Payload,
    SharedValue, Value,
};

/// hostvalue version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
