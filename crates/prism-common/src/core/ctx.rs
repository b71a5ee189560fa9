use crate::coords::Resolution;
use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;

/// Device-facing handles shared by every lifecycle context.
///
/// Lifetimes:
/// - `'a` is the duration of the hook invocation
#[derive(Copy, Clone)]
pub struct GpuCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub drawable_count: usize,
}

impl<'a> GpuCtx<'a> {
    pub fn new(gpu: &'a Gpu<'_>) -> Self {
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            drawable_count: gpu.drawable_count(),
        }
    }

    /// Compiles WGSL source into a shader module.
    pub fn create_shader(&self, label: &str, wgsl: &str) -> wgpu::ShaderModule {
        self.device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(wgsl.into()),
            })
    }
}

/// Context passed to `Example::on_init`.
pub struct InitCtx<'a> {
    pub gpu: GpuCtx<'a>,
    pub resolution: Resolution,
}

/// Context passed to `Example::on_update`.
pub struct UpdateCtx<'a> {
    pub gpu: GpuCtx<'a>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub resolution: Resolution,
}

/// Context passed to `Example::on_render`.
///
/// `target` is the view of the drawable acquired for this frame.
pub struct RenderCtx<'a> {
    pub gpu: GpuCtx<'a>,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub target: &'a wgpu::TextureView,
    pub resolution: Resolution,
}
