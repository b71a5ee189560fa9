//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, binds the GPU to the window and
//! turns every redraw request into one tick of the frame loop.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
