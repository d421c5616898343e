//! Change listeners for the cart.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A zero-argument change callback.
///
/// Listeners are compared by identity: registering the same `Rc` twice keeps
/// a single registration.
pub type Listener = Rc<dyn Fn()>;

/// The set of registered listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: Vec<Listener>,
}

impl Subscribers {
    /// Register `listener`. Returns `false` if it was already registered.
    pub(crate) fn insert(&mut self, listener: Listener) -> bool {
        if self.position(&listener).is_some() {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister `listener`. Returns `false` if it was not registered.
    pub(crate) fn remove(&mut self, listener: &Listener) -> bool {
        match self.position(listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, listener: &Listener) -> bool {
        self.position(listener).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Copy of the current listeners, so callbacks may (un)subscribe while
    /// a notification is in flight.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.listeners.clone()
    }

    fn position(&self, listener: &Listener) -> Option<usize> {
        self.listeners.iter().position(|l| same_listener(l, listener))
    }
}

/// Compare the allocation only; vtable pointers are not stable across
/// codegen units.
fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[must_use = "dropping a Subscription leaves the listener registered with no way to remove it"]
pub struct Subscription {
    registry: Weak<RefCell<Subscribers>>,
    listener: Listener,
}

impl Subscription {
    pub(crate) fn new(registry: &Rc<RefCell<Subscribers>>, listener: Listener) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            listener,
        }
    }

    /// Remove the listener. Safe to call after the store is gone or after the
    /// same listener was already removed through another handle.
    ///
    /// Returns whether a registration was removed.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(&self.listener),
            None => false,
        }
    }

    /// Check if the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.borrow().contains(&self.listener))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
