//! Named multi-subscriber application event channel.
//!
//! Independent of the live node tree: this is for application-level
//! events (socket messages, game phase changes), not device input.
//! Channels come into existence on first subscription and are pruned
//! only when an explicit unsubscribe empties them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;

type Handler = Rc<dyn Fn(&Value)>;

#[derive(Default)]
struct BusInner {
    channels: HashMap<String, Vec<(u64, Handler)>>,
    next_id: u64,
}

/// Application event bus. Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, creating the channel if absent.
    /// The returned subscription removes exactly this registration.
    pub fn on(&self, name: &str, handler: impl Fn(&Value) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .channels
                .entry(name.to_string())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };
        Subscription {
            bus: Rc::downgrade(&self.inner),
            name: name.to_string(),
            id,
        }
    }

    /// Invoke every handler currently registered under `name`, in
    /// registration order. A name with no subscribers is a no-op. The
    /// handler list is captured up front, so handlers may subscribe or
    /// unsubscribe while the emit runs; panics propagate to the caller
    /// and stop later handlers in this dispatch.
    pub fn emit(&self, name: &str, data: &Value) {
        let handlers: Vec<Handler> = match self.inner.borrow().channels.get(name) {
            Some(list) => list.iter().map(|(_, h)| h.clone()).collect(),
            None => return,
        };
        for handler in handlers {
            handler(data);
        }
    }

    /// Number of handlers currently registered under `name`.
    pub fn handler_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .channels
            .get(name)
            .map_or(0, Vec::len)
    }
}

/// Cleanup handle returned by [`EventBus::on`].
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    name: String,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        let Some(inner) = self.bus.upgrade() else { return };
        let mut inner = inner.borrow_mut();
        if let Some(list) = inner.channels.get_mut(&self.name) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                inner.channels.remove(&self.name);
            }
        }
    }
}
