//! Array keys

use std::fmt;

/// A key into an array value.
///
/// Integer and string keys are distinct: `1` and `"1"` address different
/// elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    /// Integer index
    Int(i64),
    /// String key
    Str(String),
}

impl ArrayKey {
    /// The integer index, if this is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArrayKey::Int(n) => Some(*n),
            ArrayKey::Str(_) => None,
        }
    }

    /// The string key, if this is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArrayKey::Int(_) => None,
            ArrayKey::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(n) => write!(f, "{}", n),
            ArrayKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(n: i64) -> Self {
        ArrayKey::Int(n)
    }
}

impl From<i32> for ArrayKey {
    fn from(n: i32) -> Self {
        ArrayKey::Int(i64::from(n))
    }
}

impl From<usize> for ArrayKey {
    fn from(n: usize) -> Self {
        ArrayKey::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::Str(s.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        ArrayKey::Str(s)
    }
}

impl From<&String> for ArrayKey {
    fn from(s: &String) -> Self {
        ArrayKey::Str(s.clone())
    }
}

impl From<&ArrayKey> for ArrayKey {
    fn from(key: &ArrayKey) -> Self {
        key.clone()
    }
}
