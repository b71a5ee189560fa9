use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// The device side of one frame: drawables, command recording, submission
/// and presentation.
///
/// `Gpu` is the real implementation; the frame loop only talks to this
/// trait, so its ordering and slot accounting do not depend on a GPU.
pub trait FrameDevice {
    type Drawable;
    type Encoder;

    /// Current drawable size in physical pixels.
    fn size(&self) -> PhysicalSize<u32>;

    fn resize(&mut self, size: PhysicalSize<u32>);

    /// Fires completion callbacks of finished submissions without blocking.
    fn poll(&self);

    /// Acquires the next drawable. Surface errors are handled here and
    /// reported as the action the frame loop should take.
    fn acquire_drawable(&mut self) -> Result<Self::Drawable, SurfaceErrorAction>;

    fn create_encoder(&self, label: &str) -> Self::Encoder;

    /// Submits the recorded commands; `on_complete` runs once they finished.
    fn submit<F>(&self, encoder: Self::Encoder, on_complete: F)
    where
        F: FnOnce() + Send + 'static;

    fn present(&self, drawable: Self::Drawable);
}
