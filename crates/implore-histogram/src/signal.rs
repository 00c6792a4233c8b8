//! Single-threaded change notification
//!
//! A [`Signal`] keeps a list of listeners and calls each of them with a
//! borrowed payload on [`Signal::emit`]. Listeners may subscribe or
//! unsubscribe from inside a callback; the change applies to the next emit.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Signal::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

/// Change signal carrying a reference to the new value
pub struct Signal<T: ?Sized> {
    listeners: RefCell<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: Cell<u64>,
}

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let listener: Listener<T> = Rc::new(listener);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Call every listener registered at the time of the call
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
