//! Terminal presentation for the tuidom runtime.
//!
//! The live node tree never talks to the terminal directly. This crate
//! supplies the presentation pipeline around it:
//! - [`DocumentView`] lays a live tree out into a framebuffer (pure,
//!   unit-testable)
//! - [`FrameBuffer`] holds styled character cells
//! - [`TerminalRenderer`] owns the raw-mode/alternate-screen lifecycle
//!   and flushes framebuffers with changed-run diffing

pub mod fb;
pub mod renderer;
pub mod view;

pub use tuidom_core as core;
pub use tuidom_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::TerminalRenderer;
pub use view::DocumentView;
