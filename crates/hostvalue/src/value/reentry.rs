//! Re-entry tracking for walks over values that may contain themselves
//!
//! An array can hold an alias of its own payload, and an object can hold
//! itself as a property. Formatting and comparison walk into elements, so
//! they mark every cell they enter and stop when they reach it again.

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread::LocalKey;

type Entered = RefCell<HashSet<(usize, usize)>>;

thread_local! {
    static FORMATTING: Entered = RefCell::new(HashSet::new());
    static COMPARING: Entered = RefCell::new(HashSet::new());
}

/// Marks a cell (or a pair of cells) as entered until dropped.
pub(crate) struct Reentry {
    set: &'static LocalKey<Entered>,
    key: (usize, usize),
}

impl Reentry {
    /// Enter `target` for formatting; `None` if it is already being formatted.
    pub(crate) fn formatting<T>(target: *const T) -> Option<Self> {
        Self::enter(&FORMATTING, (target as usize, 0))
    }

    /// Enter the pair `(a, b)` for comparison; `None` if that pair is
    /// already being compared further up the stack.
    pub(crate) fn comparing<T>(a: *const T, b: *const T) -> Option<Self> {
        Self::enter(&COMPARING, (a as usize, b as usize))
    }

    fn enter(set: &'static LocalKey<Entered>, key: (usize, usize)) -> Option<Self> {
        let fresh = set.with(|entered| entered.borrow_mut().insert(key));
        fresh.then_some(Reentry { set, key })
    }
}

impl Drop for Reentry {
    fn drop(&mut self) {
        self.set.with(|entered| {
            entered.borrow_mut().remove(&self.key);
        });
    }
}
