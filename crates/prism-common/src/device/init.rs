use crate::pacing::DEFAULT_DRAWABLE_COUNT;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// Off by default: the samples write colors straight into a BGRA8 unorm
    /// drawable.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Size of the drawable pool.
    ///
    /// Sizes the frame pacer and is passed to the surface as its desired
    /// maximum frame latency (a hint; support depends on platform/backend).
    pub drawable_count: usize,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            drawable_count: DEFAULT_DRAWABLE_COUNT,
        }
    }
}
