//! Listener registry that tolerates calls made from inside its own callbacks
//!
//! Page callbacks run while the registry is borrowed for an emit. A removal or
//! clear requested from inside one takes effect for the rest of that emit and
//! is applied to the registry once the emit returns.

use std::cell::{Cell, RefCell};

use isle_core::{ListenerId, Listeners};

pub struct HostRegistry<T> {
    listeners: RefCell<Listeners<T>>,
    /// Removals requested mid-emit
    deferred: RefCell<Vec<ListenerId>>,
    clear_requested: Cell<bool>,
}

impl<T> Default for HostRegistry<T> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Listeners::new()),
            deferred: RefCell::new(Vec::new()),
            clear_requested: Cell::new(false),
        }
    }
}

impl<T> HostRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Returns 0 when called from inside a callback.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> u32 {
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.subscribe(listener).0,
            Err(_) => {
                tracing::warn!("Cannot register a listener from inside a listener");
                0
            }
        }
    }

    pub fn remove(&self, id: u32) -> bool {
        let id = ListenerId(id);
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.unsubscribe(id),
            Err(_) => {
                self.deferred.borrow_mut().push(id);
                true
            }
        }
    }

    pub fn clear(&self) {
        match self.listeners.try_borrow_mut() {
            Ok(mut listeners) => listeners.clear(),
            Err(_) => self.clear_requested.set(true),
        }
    }

    /// Deliver `value` to every live listener, returning how many ran
    pub fn emit(&self, value: &T) -> usize {
        let Ok(mut listeners) = self.listeners.try_borrow_mut() else {
            tracing::warn!("Dropped a notification raised from inside a listener");
            return 0;
        };

        let delivered = listeners.emit_where(value, |id| {
            !self.clear_requested.get() && !self.deferred.borrow().contains(&id)
        });

        if self.clear_requested.replace(false) {
            listeners.clear();
        }
        for id in self.deferred.borrow_mut().drain(..) {
            listeners.unsubscribe(id);
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.listeners.try_borrow().map_or(0, |l| l.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
