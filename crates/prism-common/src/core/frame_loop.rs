use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use crate::coords::Resolution;
use crate::device::{FrameDevice, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::pacing::FramePacer;
use crate::time::{FpsCounter, FrameClock, FrameTime};

use super::example::Control;
use super::hooks::{FrameHooks, FrameInput};

/// Frame loop controller.
///
/// Owns the example and drives it through the frame pipeline:
///
/// 1. wait on the pacer for a free drawable slot and advance the frame index
/// 2. acquire the drawable
/// 3. `on_update(index)`
/// 4. record `on_render(index)` into a fresh command encoder
/// 5. submit with the pacer's completion signal, then present
pub struct FrameLoop<E> {
    example: E,
    pacer: FramePacer,
    clock: FrameClock,
    fps: FpsCounter,
    resolution: Resolution,
    initialized: bool,
    terminated: bool,
}

impl<E> FrameLoop<E> {
    pub fn new(example: E, drawable_count: usize) -> Self {
        Self {
            example,
            pacer: FramePacer::new(drawable_count),
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            resolution: Resolution::default(),
            initialized: false,
            terminated: false,
        }
    }

    pub fn example(&self) -> &E {
        &self.example
    }

    pub fn example_mut(&mut self) -> &mut E {
        &mut self.example
    }

    /// Slot of the most recently begun frame.
    #[inline]
    pub fn frame_index(&self) -> usize {
        self.pacer.frame_index()
    }

    /// Most recent frames-per-second figure.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Drawable resolution the example last saw; empty while minimised.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Whether a tick would do any work: initialized, not terminated and
    /// with a non-empty drawable.
    #[inline]
    pub fn wants_redraw(&self) -> bool {
        self.initialized && !self.terminated && !self.resolution.is_empty()
    }

    /// Runs `on_init`, then the first `on_resize` with the drawable size.
    pub fn init<D>(&mut self, device: &D) -> Result<()>
    where
        D: FrameDevice,
        E: FrameHooks<D>,
    {
        if self.initialized {
            return Ok(());
        }

        self.resolution = device.size().into();
        self.example
            .init(device, self.resolution)
            .with_context(|| format!("failed to initialize example \"{}\"", self.example.title()))?;
        self.initialized = true;

        if !self.resolution.is_empty() {
            self.example.resize(self.resolution);
        }

        self.clock.reset();
        log::info!(
            "\"{}\" initialized at {}x{} with {} drawables",
            self.example.title(),
            self.resolution.width,
            self.resolution.height,
            self.pacer.slot_count()
        );
        Ok(())
    }

    /// Reconfigures the surface and forwards new non-empty sizes to `on_resize`.
    pub fn resize<D>(&mut self, device: &mut D, size: PhysicalSize<u32>)
    where
        D: FrameDevice,
        E: FrameHooks<D>,
    {
        device.resize(size);

        let resolution = Resolution::from(size);
        if resolution == self.resolution {
            return;
        }

        self.resolution = resolution;
        if resolution.is_empty() {
            log::debug!("drawable is empty; frames are paused");
            return;
        }

        if self.initialized {
            self.example.resize(resolution);
        }
    }

    /// Runs one update + render tick.
    ///
    /// `pre_present` runs after submission, right before the drawable is
    /// presented (the runtime uses it for the windowing system's
    /// pre-present notification).
    pub fn tick<D, P>(
        &mut self,
        device: &mut D,
        input: &InputState,
        input_frame: &InputFrame,
        pre_present: P,
    ) -> Control
    where
        D: FrameDevice,
        E: FrameHooks<D>,
        P: FnOnce(),
    {
        if !self.wants_redraw() {
            return Control::Continue;
        }

        let time = self.clock.tick();
        if let Some(fps) = self.fps.record(time.raw_dt) {
            log::debug!("{}: {fps} fps", self.example.title());
        }

        match self.update(device, input, input_frame, time) {
            UpdateOutcome::Ready(index, drawable) => {
                self.render(device, index, drawable, pre_present)
            }
            UpdateOutcome::Skip => Control::Continue,
            UpdateOutcome::Exit => Control::Exit,
        }
    }

    fn update<D>(
        &mut self,
        device: &mut D,
        input: &InputState,
        input_frame: &InputFrame,
        time: FrameTime,
    ) -> UpdateOutcome<D::Drawable>
    where
        D: FrameDevice,
        E: FrameHooks<D>,
    {
        let index = self.pacer.begin_frame(|| device.poll());

        let drawable = match device.acquire_drawable() {
            Ok(drawable) => drawable,
            Err(action) => {
                self.pacer.cancel_frame();
                return match action {
                    SurfaceErrorAction::Fatal => UpdateOutcome::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        UpdateOutcome::Skip
                    }
                };
            }
        };

        let frame = FrameInput {
            input,
            input_frame,
            time,
            resolution: self.resolution,
        };
        if self.example.update(device, frame, index) == Control::Exit {
            // Nothing was recorded; the drawable is discarded unpresented.
            drop(drawable);
            self.pacer.cancel_frame();
            return UpdateOutcome::Exit;
        }

        UpdateOutcome::Ready(index, drawable)
    }

    fn render<D, P>(
        &mut self,
        device: &D,
        index: usize,
        drawable: D::Drawable,
        pre_present: P,
    ) -> Control
    where
        D: FrameDevice,
        E: FrameHooks<D>,
        P: FnOnce(),
    {
        let mut encoder = device.create_encoder("prism frame encoder");
        let control = self
            .example
            .render(device, &mut encoder, &drawable, self.resolution, index);

        device.submit(encoder, self.pacer.completion_signal());
        pre_present();
        device.present(drawable);
        log::trace!("frame presented from slot {index}");
        control
    }

    /// Waits for the GPU to finish every frame in flight, then runs `on_term`.
    pub fn term<D>(&mut self, device: &D)
    where
        D: FrameDevice,
        E: FrameHooks<D>,
    {
        if !self.initialized || self.terminated {
            return;
        }

        self.pacer.wait_idle(|| device.poll());
        self.example.term();
        self.terminated = true;
        log::info!("\"{}\" terminated", self.example.title());
    }
}

enum UpdateOutcome<T> {
    Ready(usize, T),
    Skip,
    Exit,
}
