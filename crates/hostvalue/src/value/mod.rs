//! Value representation: shared payloads, owning handles and alias groups

mod callable;
mod container;
mod convert;
mod display;
mod impls;
mod key;
mod reentry;
mod shared;

pub use callable::{Callable, Invocation, NativeHandler, Object};
pub use container::Member;
pub use convert::Number;
pub use key::ArrayKey;
pub use shared::SharedValue;

use std::cell::Ref;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

/// Ordered key → element mapping stored by array values.
pub type Array = IndexMap<ArrayKey, Value>;

/// The closed set of kinds a payload can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The null value
    Null,
    /// `true` or `false`
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit floating point
    Float,
    /// Byte string
    String,
    /// Ordered map of keys to values
    Array,
    /// Host object handle
    Object,
    /// Native callable
    Callable,
}

impl Kind {
    /// Lowercase name used in messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Callable => "callable",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The tagged payload stored in a [`SharedValue`].
pub enum Payload {
    /// The null value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Byte string (not required to be UTF-8)
    String(Vec<u8>),
    /// Array of shared elements
    Array(Array),
    /// Object handle; copies of the payload refer to the same object
    Object(Rc<Object>),
    /// Native callable
    Callable(Callable),
}

impl Payload {
    /// The kind tag of this payload.
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Null => Kind::Null,
            Payload::Bool(_) => Kind::Bool,
            Payload::Int(_) => Kind::Int,
            Payload::Float(_) => Kind::Float,
            Payload::String(_) => Kind::String,
            Payload::Array(_) => Kind::Array,
            Payload::Object(_) => Kind::Object,
            Payload::Callable(_) => Kind::Callable,
        }
    }

    /// Copy the payload for a fork.
    ///
    /// Scalars and strings are duplicated. Array elements are shared with
    /// the source (one more holder each). Objects and callables are handles,
    /// so the copy points at the same instance.
    pub fn fork(&self) -> Payload {
        match self {
            Payload::Null => Payload::Null,
            Payload::Bool(b) => Payload::Bool(*b),
            Payload::Int(n) => Payload::Int(*n),
            Payload::Float(n) => Payload::Float(*n),
            Payload::String(s) => Payload::String(s.clone()),
            Payload::Array(items) => Payload::Array(
                items
                    .iter()
                    .map(|(key, element)| (key.clone(), element.share()))
                    .collect(),
            ),
            Payload::Object(object) => Payload::Object(Rc::clone(object)),
            Payload::Callable(callable) => Payload::Callable(callable.clone()),
        }
    }
}

/// An owning handle to a [`SharedValue`].
///
/// Each handle is one holder of its payload. Handles that share a payload
/// are either an alias group (created only through [`Value::reference`] or
/// [`Value::bind_alias`]) or independent variables that happen to share
/// storage; in the latter case every write forks a private payload first.
///
/// # Example
///
/// ```
/// use hostvalue::Value;
///
/// let a = Value::from(10);
/// let mut b = a.clone();
/// b += 5;
///
/// assert_eq!(a.int_value(), 10);
/// assert_eq!(b.int_value(), 15);
/// ```
pub struct Value {
    cell: Rc<SharedValue>,
}

impl Value {
    /// Allocate a fresh payload with a single holder.
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            cell: SharedValue::new(payload),
        }
    }

    /// Create a null value.
    pub fn null() -> Self {
        Self::from_payload(Payload::Null)
    }

    /// A new handle on the same payload, without joining an alias group.
    ///
    /// This is how container reads and host results hand out values: the
    /// payload gains a holder, and the first write through either handle
    /// forks unless the payload already is an alias group.
    pub fn share(&self) -> Value {
        Value {
            cell: Rc::clone(&self.cell),
        }
    }

    /// A new handle that is a true alias of this one.
    ///
    /// If the payload is shared with other, non-aliased holders, this handle
    /// first forks a private payload so those holders are not dragged into
    /// the alias group.
    pub fn reference(&mut self) -> Value {
        self.separate();
        self.cell.set_alias_group(true);
        Value {
            cell: Rc::clone(&self.cell),
        }
    }

    /// Bind `target` as an alias of `source`.
    ///
    /// Afterwards both handles refer to one payload with the alias flag set,
    /// and `target`'s previous payload has lost a holder.
    pub fn bind_alias(source: &mut Value, target: &mut Value) {
        if source.same_payload(target) && source.is_alias() {
            return;
        }
        *target = source.reference();
    }

    /// The kind of the current payload.
    pub fn kind(&self) -> Kind {
        self.cell.kind()
    }

    /// Number of handles currently holding this payload.
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.cell)
    }

    /// Whether this handle belongs to an alias group.
    pub fn is_alias(&self) -> bool {
        self.cell.is_alias_group()
    }

    /// Whether both handles point at the same payload.
    pub fn same_payload(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// The shared cell behind this handle.
    pub fn shared(&self) -> &Rc<SharedValue> {
        &self.cell
    }

    /// Borrow the payload for reading.
    pub fn payload(&self) -> Ref<'_, Payload> {
        self.cell.borrow()
    }

    /// A handle on a private copy of this payload.
    pub fn fork(&self) -> Value {
        Value {
            cell: Rc::new(self.cell.fork()),
        }
    }

    /// Assign a new value to this variable.
    ///
    /// An alias group keeps its payload and receives a copy of the new
    /// content, so every alias observes the assignment. Any other handle is
    /// rebound to the new value. Assigning a value that already lives in
    /// this payload is a no-op.
    pub fn assign(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.assign_value(&value);
    }

    /// Assign from another handle without taking ownership of it.
    pub fn assign_value(&mut self, value: &Value) {
        if self.same_payload(value) {
            return;
        }

        if self.is_alias() {
            let payload = value.payload().fork();
            self.overwrite(payload);
        } else {
            *self = value.clone();
        }
    }

    /// Ensure this handle may write: fork if the payload is shared but not aliased.
    pub(crate) fn separate(&mut self) {
        if SharedValue::must_fork(&self.cell) {
            trace!(
                kind = %self.kind(),
                refcount = self.refcount(),
                "forking shared payload before write"
            );
            self.cell = Rc::new(self.cell.fork());
        }
    }

    /// Replace the payload, honoring the write path.
    ///
    /// A payload shared with non-aliased holders is left to them; this
    /// handle moves to a fresh cell. Otherwise the payload is replaced in
    /// place so every alias sees it.
    pub(crate) fn overwrite(&mut self, payload: Payload) {
        if SharedValue::must_fork(&self.cell) {
            self.cell = SharedValue::new(payload);
            return;
        }

        let previous = self.cell.replace(payload);
        drop(previous);
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl Clone for Value {
    /// Copy a variable.
    ///
    /// The copy shares storage when this handle is the payload's only,
    /// non-aliased holder. Otherwise it forks, so that the copy neither joins
    /// an alias group nor piles onto a payload other variables already share.
    fn clone(&self) -> Self {
        if self.refcount() > 1 || self.is_alias() {
            self.fork()
        } else {
            self.share()
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        // At most one holder remains, which cannot be aliased.
        if Rc::strong_count(&self.cell) <= 2 {
            self.cell.set_alias_group(false);
        }
    }
}
