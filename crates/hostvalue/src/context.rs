//! Call context configuration

/// Default bound on positional arguments per call.
pub const DEFAULT_MAX_ARGS: usize = 10;

/// Default bound on nested host calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Configuration for dispatching calls into a host.
///
/// Passed to the [`Invoker`](crate::Invoker) and to the in-process
/// [`Runtime`](crate::Runtime), which enforces the depth limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Maximum number of positional arguments in a single call
    pub max_args: usize,

    /// Maximum nesting of host calls (stack overflow protection)
    pub max_call_depth: usize,
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            max_args: DEFAULT_MAX_ARGS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl CallContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom argument limit.
    pub fn with_max_args(max_args: usize) -> Self {
        Self {
            max_args,
            ..Default::default()
        }
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Check whether an argument list fits this context.
    pub fn accepts_args(&self, count: usize) -> bool {
        count <= self.max_args
    }
}
