//! Ambient device input for the tuidom runtime.
//!
//! This crate is the input surface of the host environment: global
//! key-down/key-up subscription with paired cleanup handles, fed by a
//! crossterm event pump. It is independent of both the node tree and the
//! application event bus; callers that route key input into either do so
//! from their own listeners.

pub mod map;

pub use tuidom_types as types;

pub use map::{is_interrupt, key_name, key_press, translate_key};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event::{self, Event};

use tuidom_types::{EventKind, UiEvent};

/// Upper bound on events translated per [`InputEvents::pump`] call;
/// anything beyond it stays queued for the next call.
const PUMP_BATCH: usize = 16;

type Handler = Rc<dyn Fn(&UiEvent)>;

#[derive(Default)]
struct InputInner {
    listeners: Vec<(u64, EventKind, Handler)>,
    next_id: u64,
}

/// Registry of device-level listeners plus the terminal event pump.
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct InputEvents {
    inner: Rc<RefCell<InputInner>>,
}

impl InputEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind directly against the device
    /// input source. Returns the paired cleanup handle; callers must
    /// invoke it on teardown (e.g. when switching views) or stale
    /// handlers accumulate.
    pub fn listen(&self, kind: EventKind, handler: impl Fn(&UiEvent) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, kind, Rc::new(handler)));
            id
        };
        Subscription {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver an event to every listener of its kind, in registration
    /// order, over a list captured at dispatch time.
    pub fn dispatch(&self, event: &UiEvent) {
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    /// Poll the terminal for up to `timeout`, translate pending key
    /// events and dispatch them. Returns the number of events delivered.
    ///
    /// The first poll waits; once something arrived, the rest of the
    /// batch drains without blocking.
    pub fn pump(&self, timeout: Duration) -> Result<usize> {
        let mut batch: ArrayVec<UiEvent, PUMP_BATCH> = ArrayVec::new();
        let mut wait = timeout;
        while !batch.is_full() && event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if let Some(ev) = translate_key(&key) {
                    batch.push(ev);
                }
            }
            wait = Duration::from_millis(0);
        }
        for ev in &batch {
            self.dispatch(ev);
        }
        Ok(batch.len())
    }

    /// Number of registered listeners (all kinds).
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Cleanup handle returned by [`InputEvents::listen`].
pub struct Subscription {
    registry: Weak<RefCell<InputInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _, _)| *id != self.id);
        }
    }
}
