//! Diff/patch renderer for tuidom.
//!
//! One entry point: [`Renderer::render`]. The first render into a target
//! mounts the whole tree; every later render reconciles the new tree
//! against the per-target snapshot of the previous one and applies the
//! minimal set of host mutations. Child lists marked keyed at
//! construction go through the keyed reconciler, which preserves node
//! identity across reorders.

pub mod diff;
pub mod keyed;
pub mod mount;

pub use tuidom_core as core;
pub use tuidom_types as types;

pub use diff::{changed, Renderer};
pub use mount::mount;
