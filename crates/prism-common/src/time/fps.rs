use std::time::Duration;

const WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second counter.
///
/// Frames are counted while elapsed time accumulates; once a full second has
/// been observed the count becomes the published figure and both restart.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame that took `dt`. Returns the new figure when one is
    /// published by this call.
    pub fn record(&mut self, dt: Duration) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;

        if self.elapsed < WINDOW {
            return None;
        }

        self.fps = self.frames;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(self.fps)
    }

    /// Most recently published figure; zero until the first second elapses.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_published_before_a_second() {
        let mut fps = FpsCounter::new();
        for _ in 0..59 {
            assert_eq!(fps.record(Duration::from_millis(16)), None);
        }
        assert_eq!(fps.fps(), 0);
    }

    #[test]
    fn publishes_frame_count_after_a_second() {
        let mut fps = FpsCounter::new();
        let mut published = None;
        for _ in 0..100 {
            if let Some(v) = fps.record(Duration::from_millis(10)) {
                published = Some(v);
                break;
            }
        }
        assert_eq!(published, Some(100));
        assert_eq!(fps.fps(), 100);
    }

    #[test]
    fn restarts_after_publishing() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.record(Duration::from_secs(2)), Some(1));
        assert_eq!(fps.record(Duration::from_millis(500)), None);
        assert_eq!(fps.record(Duration::from_millis(500)), Some(2));
    }
}
