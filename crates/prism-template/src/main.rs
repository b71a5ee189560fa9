//! Template sample: the smallest program the frame loop can drive.
//!
//! Clears every drawable to light steel blue with the viewport and scissor
//! covering the whole window. Copy this crate to start a new sample.

use anyhow::Result;
use prism_common::logging::{init_logging, LoggingConfig};
use prism_common::{
    Control, Example, GpuInit, InitCtx, RenderCtx, Resolution, Runtime, RuntimeConfig,
    ScissorRect, UpdateCtx, Viewport,
};

const LIGHT_STEEL_BLUE: wgpu::Color = wgpu::Color {
    r: 0.69,
    g: 0.77,
    b: 0.87,
    a: 1.0,
};

#[derive(Debug, Default)]
struct Template {
    viewport: Viewport,
    scissor_rect: ScissorRect,
}

impl Example for Template {
    fn title(&self) -> &str {
        "Template"
    }

    fn on_init(&mut self, ctx: &mut InitCtx<'_>) -> Result<()> {
        log::debug!("template clearing {:?} drawables", ctx.gpu.surface_format);
        Ok(())
    }

    fn on_resize(&mut self, resolution: Resolution) {
        self.viewport = Viewport::from_resolution(resolution);
        self.scissor_rect = ScissorRect::from_resolution(resolution);
    }

    fn on_update(&mut self, _ctx: &mut UpdateCtx<'_>, _index: usize) -> Control {
        Control::Continue
    }

    fn on_render(&mut self, ctx: &mut RenderCtx<'_>, _index: usize) -> Control {
        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("template pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(LIGHT_STEEL_BLUE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.viewport.apply(&mut pass);
        self.scissor_rect.apply(&mut pass);
        Control::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), Template::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_covers_the_whole_drawable() {
        let mut template = Template::default();
        template.on_resize(Resolution::new(800, 600));

        assert_eq!(template.viewport, Viewport::from_resolution(Resolution::new(800, 600)));
        assert_eq!(template.scissor_rect.width, 800);
        assert_eq!(template.scissor_rect.height, 600);
    }
}
