//! The shared payload cell behind every value handle

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use super::{Kind, Payload};

/// A reference-counted payload that may be held by several [`Value`](super::Value) handles.
///
/// The reference count is the strong count of the surrounding `Rc`. The
/// alias flag records whether the holders are true aliases of one variable
/// (writes are visible through all of them) or merely share storage until
/// one of them writes.
pub struct SharedValue {
    payload: RefCell<Payload>,
    alias: Cell<bool>,
}

impl SharedValue {
    /// Allocate a fresh cell with a single holder and no alias group.
    pub(crate) fn new(payload: Payload) -> Rc<Self> {
        Rc::new(Self {
            payload: RefCell::new(payload),
            alias: Cell::new(false),
        })
    }

    /// The kind of the stored payload.
    pub fn kind(&self) -> Kind {
        self.payload.borrow().kind()
    }

    /// Whether every holder of this cell is an alias of the others.
    pub fn is_alias_group(&self) -> bool {
        self.alias.get()
    }

    pub(crate) fn set_alias_group(&self, alias: bool) {
        self.alias.set(alias);
    }

    /// Produce a private copy: same content, one holder, no alias group.
    ///
    /// Array elements are shared with the original rather than copied, so a
    /// later write to either array only forks the element it touches.
    pub fn fork(&self) -> SharedValue {
        SharedValue {
            payload: RefCell::new(self.payload.borrow().fork()),
            alias: Cell::new(false),
        }
    }

    /// Whether a holder must fork before writing.
    ///
    /// True when the cell has several holders that are not an alias group.
    pub fn must_fork(this: &Rc<Self>) -> bool {
        Rc::strong_count(this) > 1 && !this.is_alias_group()
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Payload> {
        self.payload.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Payload> {
        self.payload.borrow_mut()
    }

    /// Swap the payload in place, returning the previous one.
    pub(crate) fn replace(&self, payload: Payload) -> Payload {
        self.payload.replace(payload)
    }
}
