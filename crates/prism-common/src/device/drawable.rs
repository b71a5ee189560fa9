/// A presentable surface texture acquired for one frame.
///
/// Holding a drawable blocks acquisition of the next one once the swapchain
/// is exhausted; present or drop it promptly.
pub struct Drawable {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Drawable {
    pub(crate) fn new(texture: wgpu::SurfaceTexture) -> Self {
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
