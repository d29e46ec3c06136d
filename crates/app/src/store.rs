//! Single mutable state container with shallow-merge updates and
//! synchronous subscriber fan-out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};

/// Store state: named fields mapped to JSON values.
pub type State = Map<String, Value>;

type Listener = Rc<dyn Fn(&State)>;

struct StoreInner {
    state: State,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Shared state container. Cloning yields another handle to the same
/// store; the store lives as long as any handle does.
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<StoreInner>>,
}

impl Store {
    pub fn new(initial: State) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: initial,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current state as a deep copy. Mutating the returned map (including
    /// nested arrays and objects) never touches live state; all writes go
    /// through [`Store::set_state`].
    pub fn get_state(&self) -> State {
        self.inner.borrow().state.clone()
    }

    /// One field of the current state, deep-copied.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.inner.borrow().state.get(field).cloned()
    }

    /// Shallow-merge `partial` into the state, field by field, then
    /// synchronously invoke every subscriber with the merged state in
    /// subscription order. No batching: n calls mean n full fan-outs,
    /// each completing before `set_state` returns. The listener list is
    /// captured up front, so a listener unsubscribing (itself or others)
    /// mid-fan-out takes effect on the next dispatch.
    pub fn set_state(&self, partial: State) {
        let (state, listeners) = {
            let mut inner = self.inner.borrow_mut();
            for (field, value) in partial {
                inner.state.insert(field, value);
            }
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.state.clone(), listeners)
        };
        for listener in listeners {
            listener(&state);
        }
    }

    /// Convenience single-field update.
    pub fn set(&self, field: &str, value: Value) {
        let mut partial = State::new();
        partial.insert(field.to_string(), value);
        self.set_state(partial);
    }

    /// Register a listener; the returned subscription removes exactly
    /// this registration.
    pub fn subscribe(&self, listener: impl Fn(&State) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(listener)));
            id
        };
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }
}

/// Cleanup handle returned by [`Store::subscribe`].
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
