//! tuidom (workspace facade crate).
//!
//! This package re-exports the public API of the dedicated crates under
//! `crates/` as `tuidom::{types,core,render,app,input,term}`.

pub use tuidom_app as app;
pub use tuidom_core as core;
pub use tuidom_input as input;
pub use tuidom_render as render;
pub use tuidom_term as term;
pub use tuidom_types as types;
