//! Value trait implementations: constructors, predicates, From traits, PartialEq

use std::rc::Rc;

use super::reentry::Reentry;
use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::from_payload(Payload::String(s.into().into_bytes()))
    }

    /// Create a byte string value
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::from_payload(Payload::String(b.into()))
    }

    /// Create a value holding a new object of `class`
    pub fn object(class: impl Into<String>) -> Self {
        Self::from_payload(Payload::Object(Rc::new(Object::new(class))))
    }

    /// Create a value holding an existing object handle
    pub fn from_object(object: Rc<Object>) -> Self {
        Self::from_payload(Payload::Object(object))
    }

    /// Create a callable value from a native handler
    pub fn callable<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Option<Value>, Value> + 'static,
    {
        Self::from_payload(Payload::Callable(Callable::new(name, handler)))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Kind Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    /// Check if value is boolean
    pub fn is_bool(&self) -> bool {
        self.kind() == Kind::Bool
    }

    /// Check if value is an integer
    pub fn is_int(&self) -> bool {
        self.kind() == Kind::Int
    }

    /// Check if value is a float
    pub fn is_float(&self) -> bool {
        self.kind() == Kind::Float
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    /// Check if value is an array
    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    /// Check if value is an object
    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    /// Check if value holds a native callable.
    ///
    /// Strings and arrays may be callable too; ask the host through
    /// [`Invoker::is_callable`](crate::Invoker::is_callable) for that.
    pub fn is_callable_kind(&self) -> bool {
        self.kind() == Kind::Callable
    }

    /// The object handle, if this is an object
    pub fn as_object(&self) -> Option<Rc<Object>> {
        match &*self.payload() {
            Payload::Object(object) => Some(Rc::clone(object)),
            _ => None,
        }
    }

    /// The callable, if this holds one
    pub fn as_callable(&self) -> Option<Callable> {
        match &*self.payload() {
            Payload::Callable(callable) => Some(callable.clone()),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Null, Payload::Null) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Float(a), Payload::Float(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => a == b,

            // Same keys in the same order, element-wise equal
            (Payload::Array(a), Payload::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }

            // Handles are equal if they refer to the same instance
            (Payload::Object(a), Payload::Object(b)) => Rc::ptr_eq(a, b),
            (Payload::Callable(a), Payload::Callable(b)) => a.same_handler(b),

            // Different kinds are never equal
            _ => false,
        }
    }
}

/// A payload always equals itself. Two self-referencing arrays compare
/// equal when their walks meet the same pair of cells again without having
/// found a difference.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.same_payload(other) {
            return true;
        }
        let Some(_entered) =
            Reentry::comparing(Rc::as_ptr(self.shared()), Rc::as_ptr(other.shared()))
        else {
            return true;
        };
        *self.payload() == *other.payload()
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::null()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_payload(Payload::Bool(b))
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::from_payload(Payload::Int(i64::from(n)))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::from_payload(Payload::Int(i64::from(n)))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_payload(Payload::Int(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::from_payload(Payload::Float(n))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::string(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::bytes(b)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::from_payload(Payload::Callable(callable))
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or_default()
    }
}

/// A list: elements keyed `0..n`
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        let array: Array = items
            .into_iter()
            .enumerate()
            .map(|(i, element)| (ArrayKey::from(i), element))
            .collect();
        Value::from_payload(Payload::Array(array))
    }
}

impl<K, V> FromIterator<(K, V)> for Value
where
    K: Into<ArrayKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let array: Array = iter
            .into_iter()
            .map(|(key, element)| (key.into(), element.into()))
            .collect();
        Value::from_payload(Payload::Array(array))
    }
}
