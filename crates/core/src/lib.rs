//! Node model and live render target for the tuidom runtime.
//!
//! `vnode` is the declarative side: a cheap tree of tags, attributes and
//! children that application code rebuilds on every state change. `live`
//! is the retained side: the mutable node tree the renderer patches in
//! place. The renderer crate owns the traffic between the two.

pub mod live;
pub mod vnode;

pub use tuidom_types as types;

pub use live::{node_id, Document, LiveElement, LiveNode, LiveText, NodeHandle};
pub use vnode::{el, text, AttrValue, Child, EventHandler, ListMode, RefHook, VElement, VNode};
