//! Display and Debug implementations for Value

use std::fmt;
use std::rc::Rc;

use super::reentry::Reentry;
use super::*;

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "null"),
            Payload::Bool(b) => write!(f, "{}", b),
            Payload::Int(n) => write!(f, "{}", n),
            Payload::Float(n) => write!(f, "{:?}", n),
            Payload::String(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Payload::Array(items) => {
                write!(f, "[")?;
                for (i, (key, element)) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match key {
                        ArrayKey::Int(n) => write!(f, "{} => {:?}", n, element)?,
                        ArrayKey::Str(s) => write!(f, "{:?} => {:?}", s, element)?,
                    }
                }
                write!(f, "]")
            }
            Payload::Object(object) => write!(f, "{:?}", object),
            Payload::Callable(callable) => write!(f, "{:?}", callable),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Alias groups are marked the way the host's dumper marks references
        if self.is_alias() {
            write!(f, "&")?;
        }
        let Some(_entered) = Reentry::formatting(Rc::as_ptr(self.shared())) else {
            return write!(f, "*RECURSION*");
        };
        write!(f, "{:?}", &*self.payload())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value())
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("payload", &*self.borrow())
            .field("alias", &self.is_alias_group())
            .finish()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_entered) = Reentry::formatting(self as *const Object) else {
            return write!(f, "{} {{ *RECURSION* }}", self.class_name());
        };
        write!(f, "{} {{", self.class_name())?;
        for (i, (name, value)) in self.properties().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {:?}", name, value)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<callable {}>", self.name())
    }
}
