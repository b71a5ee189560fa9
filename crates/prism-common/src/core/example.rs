use anyhow::Result;
use winit::event::WindowEvent;

use crate::coords::Resolution;

use super::ctx::{InitCtx, RenderCtx, UpdateCtx};

/// Control directive returned by per-frame hooks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Control {
    Continue,
    Exit,
}

/// A sample program driven by the frame loop.
///
/// `index` passed to `on_update` / `on_render` is the drawable slot of the
/// current frame, always below the drawable count. Resources written every
/// frame (uniforms, per-frame buffers) should be indexed by it so the CPU
/// never overwrites data a frame still in flight is reading.
pub trait Example {
    /// Window title.
    fn title(&self) -> &str;

    /// Creates GPU resources. Called once, before the first resize.
    fn on_init(&mut self, ctx: &mut InitCtx<'_>) -> Result<()>;

    /// Called once after the last frame, with the GPU idle.
    fn on_term(&mut self) {}

    /// Called with every new non-empty drawable resolution.
    fn on_resize(&mut self, resolution: Resolution);

    /// Raw window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> Control {
        let _ = event;
        Control::Continue
    }

    /// Updates per-frame state. The drawable is already acquired.
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>, index: usize) -> Control;

    /// Records the frame's commands into `ctx.encoder`.
    ///
    /// The frame is submitted and presented either way; `Control::Exit`
    /// ends the loop afterwards.
    fn on_render(&mut self, ctx: &mut RenderCtx<'_>, index: usize) -> Control;
}
