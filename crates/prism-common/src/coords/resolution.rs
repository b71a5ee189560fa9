use winit::dpi::PhysicalSize;

/// Drawable resolution in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// The default window resolution (1280x720).
    pub const HD: Self = Self::new(1280, 720);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area resolution (minimised window). Nothing can be rendered.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; 1.0 for empty resolutions.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

impl From<PhysicalSize<u32>> for Resolution {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Resolution> for PhysicalSize<u32> {
    fn from(r: Resolution) -> Self {
        PhysicalSize::new(r.width, r.height)
    }
}
