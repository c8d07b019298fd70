//! Error types for value operations and host dispatch

use thiserror::Error;

use crate::value::{Kind, Value};

/// Main error type for value operations.
///
/// Lookups never produce an error: missing keys, non-callable targets and
/// unknown methods all resolve to a Null value. Only the conditions below
/// unwind to the caller.
#[derive(Error, Debug)]
pub enum ValueError {
    /// The host raised an exception while a call was in progress.
    #[error("Host exception: {exception:?}")]
    HostException {
        /// The exception object raised by the host
        exception: Value,
    },

    /// Division or modulo where the divisor coerces to zero.
    #[error("Division by zero in `{op}`")]
    DivisionByZero {
        /// The operator that was applied
        op: &'static str,
    },

    /// A conversion that had to be delegated to the host could not be performed.
    #[error("Cannot convert {from} to {to}")]
    Conversion {
        /// Kind of the source value
        from: Kind,
        /// Requested kind
        to: Kind,
    },
}

impl ValueError {
    /// The exception payload, if this error came from the host.
    pub fn exception(&self) -> Option<&Value> {
        match self {
            ValueError::HostException { exception } => Some(exception),
            _ => None,
        }
    }
}

/// Result type alias for value operations
pub type Result<T> = std::result::Result<T, ValueError>;

/// Get a human-readable name for a value's kind.
pub fn type_name(value: &Value) -> &'static str {
    value.kind().name()
}
