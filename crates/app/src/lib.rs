//! Application glue utilities: state store, router, event bus.
//!
//! All three are explicit instances handed to whoever needs them;
//! nothing in this crate is process-global. Handles are cheap clones
//! over shared single-threaded state, and every dispatch is synchronous:
//! a `set_state` or `emit` call returns only after all of its listeners
//! ran to completion.

pub mod bus;
pub mod router;
pub mod store;

pub use bus::EventBus;
pub use router::{Router, WILDCARD};
pub use store::{State, Store};
