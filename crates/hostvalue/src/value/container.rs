//! Indexed access into array values

use tracing::debug;

use super::{Array, ArrayKey, Kind, Payload, Value};

impl Value {
    /// Create an empty array.
    pub fn array() -> Self {
        Self::from_payload(Payload::Array(Array::new()))
    }

    /// Number of elements, for arrays.
    ///
    /// Strings report their byte length and objects report 0. Any other
    /// value reports the length of its string form.
    pub fn size(&self) -> usize {
        match &*self.payload() {
            Payload::Array(items) => items.len(),
            Payload::String(s) => s.len(),
            Payload::Object(_) => 0,
            _ => self.clone_as(Kind::String).size(),
        }
    }

    /// Check whether an array has an element at `key`.
    ///
    /// Always false for objects and scalars.
    pub fn contains(&self, key: impl Into<ArrayKey>) -> bool {
        let key = key.into();
        match &*self.payload() {
            Payload::Array(items) => items.contains_key(&key),
            _ => false,
        }
    }

    /// A handle on the element at `key`.
    ///
    /// The handle shares the element's payload; reading never forks. A
    /// missing key, or a receiver that is not an array, yields null.
    pub fn get(&self, key: impl Into<ArrayKey>) -> Value {
        let key = key.into();
        match &*self.payload() {
            Payload::Array(items) => items.get(&key).map(Value::share).unwrap_or_default(),
            _ => Value::null(),
        }
    }

    /// Store `value` at `key`, turning this value into an array if needed.
    ///
    /// The element shares `value`'s payload. Storing the payload the key
    /// already holds changes nothing.
    ///
    /// Storing an alias of the array inside itself is allowed. Formatting
    /// and comparison stop at the cycle, but the payload is an `Rc` cycle
    /// and is never freed: there is no collector here to break it.
    pub fn set(&mut self, key: impl Into<ArrayKey>, value: &Value) {
        let key = key.into();
        if let Payload::Array(items) = &*self.payload() {
            if items.get(&key).is_some_and(|current| current.same_payload(value)) {
                return;
            }
        }

        self.coerce_to_array();
        self.separate();

        let replaced = match &mut *self.shared().borrow_mut() {
            Payload::Array(items) => items.insert(key, value.share()),
            _ => None,
        };
        drop(replaced);
    }

    /// Remove the element at `key`, returning whether it existed.
    pub fn remove(&mut self, key: impl Into<ArrayKey>) -> bool {
        let key = key.into();
        if !self.contains(&key) {
            return false;
        }

        self.separate();
        let removed = match &mut *self.shared().borrow_mut() {
            Payload::Array(items) => items.shift_remove(&key),
            _ => None,
        };
        removed.is_some()
    }

    /// Turn a non-array into an empty array, discarding its content.
    ///
    /// Returns whether a conversion happened. This is the auto-vivification
    /// step that [`Value::set`] performs on scalars, null and objects.
    pub fn coerce_to_array(&mut self) -> bool {
        if self.is_array() {
            return false;
        }

        debug!(from = %self.kind(), "auto-vivifying array");
        self.overwrite(Payload::Array(Array::new()));
        true
    }

    /// Keys of an array in insertion order; empty for anything else.
    pub fn keys(&self) -> Vec<ArrayKey> {
        match &*self.payload() {
            Payload::Array(items) => items.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Key/element pairs of an array, each element shared.
    pub fn entries(&self) -> Vec<(ArrayKey, Value)> {
        match &*self.payload() {
            Payload::Array(items) => items
                .iter()
                .map(|(key, element)| (key.clone(), element.share()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A proxy for the element at `key`.
    pub fn member(&mut self, key: impl Into<ArrayKey>) -> Member<'_> {
        Member {
            owner: self,
            key: key.into(),
        }
    }
}

/// A deferred read/write of one array element.
///
/// Rust has no implicit conversion operators, so instead of one expression
/// acting as both rvalue and lvalue the proxy offers [`Member::read`]
/// (a `get`) and [`Member::write`] (a `set`).
///
/// # Example
///
/// ```
/// use hostvalue::Value;
///
/// let mut v = Value::array();
/// v.member("x").write(1);
/// assert_eq!(v.member("x").read().int_value(), 1);
/// ```
pub struct Member<'a> {
    owner: &'a mut Value,
    key: ArrayKey,
}

impl Member<'_> {
    /// The key this proxy addresses.
    pub fn key(&self) -> &ArrayKey {
        &self.key
    }

    /// Check whether the element exists.
    pub fn exists(&self) -> bool {
        self.owner.contains(&self.key)
    }

    /// Resolve as a read.
    pub fn read(&self) -> Value {
        self.owner.get(&self.key)
    }

    /// Resolve as a write.
    pub fn write(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.owner.set(&self.key, &value);
        self
    }

    /// Read the element, modify it, and store it back.
    ///
    /// Nested containers are written this way: the element is forked on
    /// its first write (unless it is an alias), then replaces the original.
    pub fn update<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Value),
    {
        let mut element = self.read();
        f(&mut element);
        self.owner.set(&self.key, &element);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_to_array_discards_scalar() {
        let mut v = Value::from(5);
        assert!(v.coerce_to_array());
        assert!(v.is_array());
        assert_eq!(v.size(), 0);
        assert!(!v.coerce_to_array());
    }

    #[test]
    fn test_remove() {
        let mut v = Value::array();
        v.set("a", &Value::from(1));
        v.set("b", &Value::from(2));
        assert!(v.remove("a"));
        assert!(!v.remove("a"));
        assert_eq!(v.keys(), vec![ArrayKey::from("b")]);
    }

    #[test]
    fn test_remove_forks_shared_array() {
        let mut v = Value::array();
        v.set(0, &Value::from(1));
        let w = v.share();
        assert!(v.remove(0));
        assert_eq!(w.size(), 1);
        assert_eq!(v.size(), 0);
    }

    #[test]
    fn test_member_update_nested() {
        let mut v = Value::array();
        v.member("inner").update(|inner| inner.set("x", &Value::from(1)));
        assert_eq!(v.get("inner").get("x").int_value(), 1);
    }
}
