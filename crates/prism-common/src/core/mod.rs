//! Example lifecycle and the frame loop controller.
//!
//! This module defines the contract between the runtime (platform loop) and
//! the sample programs. The runtime owns the window and the GPU; `FrameLoop`
//! owns the example and the frame pacing, and invokes the example's hooks in
//! a fixed order:
//!
//! `on_init` -> `on_resize` -> (`on_update` -> `on_render`)* -> `on_term`
//!
//! with further `on_resize` calls whenever the drawable size changes.

mod ctx;
mod example;
mod frame_loop;
mod hooks;

pub use ctx::{GpuCtx, InitCtx, RenderCtx, UpdateCtx};
pub use example::{Control, Example};
pub use frame_loop::FrameLoop;
pub use hooks::{FrameHooks, FrameInput};
