use anyhow::Result;

use crate::coords::Resolution;
use crate::device::{Drawable, FrameDevice, Gpu};
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;

use super::ctx::{GpuCtx, InitCtx, RenderCtx, UpdateCtx};
use super::example::{Control, Example};

/// Per-tick inputs handed to `FrameHooks::update`.
#[derive(Copy, Clone)]
pub struct FrameInput<'a> {
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub resolution: Resolution,
}

/// Lifecycle hooks as the frame loop calls them for a given device.
///
/// Every `Example` implements this for `Gpu`, building its contexts from the
/// device; other devices only appear in tests.
pub trait FrameHooks<D: FrameDevice> {
    fn title(&self) -> &str;

    fn init(&mut self, device: &D, resolution: Resolution) -> Result<()>;

    fn resize(&mut self, resolution: Resolution);

    fn update(&mut self, device: &D, frame: FrameInput<'_>, index: usize) -> Control;

    fn render(
        &mut self,
        device: &D,
        encoder: &mut D::Encoder,
        drawable: &D::Drawable,
        resolution: Resolution,
        index: usize,
    ) -> Control;

    fn term(&mut self);
}

impl<'w, E: Example> FrameHooks<Gpu<'w>> for E {
    fn title(&self) -> &str {
        Example::title(self)
    }

    fn init(&mut self, device: &Gpu<'w>, resolution: Resolution) -> Result<()> {
        let mut ctx = InitCtx {
            gpu: GpuCtx::new(device),
            resolution,
        };
        self.on_init(&mut ctx)
    }

    fn resize(&mut self, resolution: Resolution) {
        self.on_resize(resolution);
    }

    fn update(&mut self, device: &Gpu<'w>, frame: FrameInput<'_>, index: usize) -> Control {
        let mut ctx = UpdateCtx {
            gpu: GpuCtx::new(device),
            input: frame.input,
            input_frame: frame.input_frame,
            time: frame.time,
            resolution: frame.resolution,
        };
        self.on_update(&mut ctx, index)
    }

    fn render(
        &mut self,
        device: &Gpu<'w>,
        encoder: &mut wgpu::CommandEncoder,
        drawable: &Drawable,
        resolution: Resolution,
        index: usize,
    ) -> Control {
        let mut ctx = RenderCtx {
            gpu: GpuCtx::new(device),
            encoder,
            target: &drawable.view,
            resolution,
        };
        self.on_render(&mut ctx, index)
    }

    fn term(&mut self) {
        self.on_term();
    }
}
