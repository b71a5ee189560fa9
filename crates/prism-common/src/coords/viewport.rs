use super::Resolution;

/// Render-pass viewport: pixel rectangle plus depth range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Covers the whole drawable with the full `[0, 1]` depth range.
    pub fn from_resolution(resolution: Resolution) -> Self {
        Self {
            width: resolution.width as f32,
            height: resolution.height as f32,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_viewport(self.x, self.y, self.width, self.height, self.min_depth, self.max_depth);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Render-pass scissor rectangle in pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub fn from_resolution(resolution: Resolution) -> Self {
        Self {
            x: 0,
            y: 0,
            width: resolution.width,
            height: resolution.height,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sets the scissor on `pass`. Empty rects are skipped, wgpu rejects them.
    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.is_empty() {
            return;
        }
        pass.set_scissor_rect(self.x, self.y, self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_resolution_with_full_depth() {
        let vp = Viewport::from_resolution(Resolution::new(640, 480));
        assert_eq!(vp.width, 640.0);
        assert_eq!(vp.height, 480.0);
        assert_eq!((vp.min_depth, vp.max_depth), (0.0, 1.0));
        assert!(vp.is_valid());
    }

    #[test]
    fn default_viewport_is_invalid() {
        assert!(!Viewport::default().is_valid());
    }

    #[test]
    fn scissor_covers_resolution() {
        let sr = ScissorRect::from_resolution(Resolution::new(640, 480));
        assert_eq!(sr, ScissorRect { x: 0, y: 0, width: 640, height: 480 });
        assert!(ScissorRect::default().is_empty());
    }
}
