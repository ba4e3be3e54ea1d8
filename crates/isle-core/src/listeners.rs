//! Host notification listeners
//!
//! A small callback registry used to deliver stage and is-rotating changes to
//! the hosting application. Removing a listener (or clearing the registry on
//! unmount) guarantees it is never called again.

use std::fmt;

/// Handle returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

pub struct Listeners<T> {
    next_id: u32,
    entries: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; ids are never reused
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Call every registered callback in registration order, returning how many ran
    pub fn emit(&mut self, value: &T) -> usize {
        self.emit_where(value, |_| true)
    }

    /// Like [`Listeners::emit`], but `allow` is asked before each callback runs
    pub fn emit_where(&mut self, value: &T, mut allow: impl FnMut(ListenerId) -> bool) -> usize {
        let mut delivered = 0;
        for (id, listener) in self.entries.iter_mut() {
            if allow(*id) {
                listener(value);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
