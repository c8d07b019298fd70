//! RAII guard for call depth tracking

use std::cell::Cell;

use super::Runtime;

/// Counts one level of call nesting for as long as it lives.
///
/// Obtained from [`Runtime::enter_call`]; dropping it leaves the level, so an
/// early return out of a handler cannot leak depth.
///
/// # Example
///
/// ```
/// use hostvalue::Runtime;
///
/// let rt = Runtime::new();
/// {
///     let _guard = rt.enter_call().unwrap();
///     assert_eq!(rt.depth(), 1);
/// }
/// assert_eq!(rt.depth(), 0);
/// ```
pub struct CallGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Runtime {
    /// Enter one level of nesting, or `None` if the limit is reached.
    pub fn enter_call(&self) -> Option<CallGuard<'_>> {
        let current = self.depth.get();
        if current >= self.ctx.max_call_depth {
            return None;
        }
        self.depth.set(current + 1);
        Some(CallGuard { depth: &self.depth })
    }

    /// Current nesting of host calls.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
