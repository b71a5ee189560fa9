use std::time::{Duration, Instant};

/// Timing snapshot for one tick of the frame loop.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Unclamped time since the previous tick.
    pub raw_dt: Duration,

    pub now: Instant,

    /// Number of ticks before this one.
    pub tick: u64,
}

/// Produces `FrameTime` snapshots for a single loop.
///
/// The clamped `dt` stays within `[dt_min, dt_max]` so a debugger pause or a
/// minimised window does not feed a huge step into camera or animation
/// updates. `raw_dt` is left untouched for statistics.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    tick: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            tick: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement from now, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`. Timestamps earlier than the previous tick
    /// count as zero elapsed time.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw_dt = now.saturating_duration_since(self.last);
        let dt = raw_dt.clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            raw_dt,
            now,
            tick: self.tick,
        };

        self.tick = self.tick.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
