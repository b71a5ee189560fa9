use std::time::Duration;

use super::semaphore::FrameSemaphore;

/// Default number of drawable slots (double buffering).
pub const DEFAULT_DRAWABLE_COUNT: usize = 2;

/// Upper bound on a single wait before the pump runs again.
const PUMP_INTERVAL: Duration = Duration::from_millis(1);

/// Semaphore-gated frame index over a fixed pool of drawable slots.
///
/// Invariants:
/// - `frame_index() < slot_count()`
/// - at most `slot_count()` frames are begun and not yet completed
#[derive(Debug)]
pub struct FramePacer {
    semaphore: FrameSemaphore,
    slot_count: usize,
    frame_index: usize,
    frame_open: bool,
}

impl FramePacer {
    /// Creates a pacer over `slot_count` slots. Zero is raised to one.
    pub fn new(slot_count: usize) -> Self {
        let semaphore = FrameSemaphore::new(slot_count);
        let slot_count = semaphore.capacity();

        Self {
            semaphore,
            slot_count,
            frame_index: 0,
            frame_open: false,
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Index of the slot used by the most recently begun frame.
    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Frames begun whose completion has not been signalled yet.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.slot_count - self.semaphore.available()
    }

    /// Waits for a free slot, then advances and returns the frame index.
    ///
    /// `pump` runs between bounded waits while no slot is free. Completion
    /// callbacks of GPU queues only fire when the device is polled, so the
    /// caller passes the device poll here.
    pub fn begin_frame<F>(&mut self, mut pump: F) -> usize
    where
        F: FnMut(),
    {
        if self.frame_open {
            log::warn!("frame {} was never submitted; releasing its slot", self.frame_index);
            self.cancel_frame();
        }

        let pumps = self.acquire_slot(&mut pump);
        if pumps > 0 {
            log::trace!("frame pacing waited {pumps} pump cycles for a free slot");
        }

        self.frame_index = (self.frame_index + 1) % self.slot_count;
        self.frame_open = true;
        self.frame_index
    }

    /// Hands off the open frame and returns the closure that frees its slot.
    ///
    /// Pass the closure to the queue's submitted-work-done callback.
    pub fn completion_signal(&mut self) -> impl FnOnce() + Send + 'static + use<> {
        debug_assert!(self.frame_open, "completion_signal without an open frame");
        self.frame_open = false;
        self.semaphore.signal()
    }

    /// Abandons the open frame and frees its slot immediately.
    ///
    /// The frame index is not rolled back. No-op if no frame is open.
    pub fn cancel_frame(&mut self) {
        if !self.frame_open {
            return;
        }

        self.frame_open = false;
        self.semaphore.release();
    }

    /// Blocks until every slot is free, i.e. the GPU has finished all frames.
    ///
    /// An open frame is cancelled first.
    pub fn wait_idle<F>(&mut self, mut pump: F)
    where
        F: FnMut(),
    {
        self.cancel_frame();

        for _ in 0..self.slot_count {
            self.acquire_slot(&mut pump);
        }
        for _ in 0..self.slot_count {
            self.semaphore.release();
        }
    }

    fn acquire_slot<F>(&self, pump: &mut F) -> u32
    where
        F: FnMut(),
    {
        let mut pumps = 0;
        while !self.semaphore.try_acquire() {
            pump();
            pumps += 1;
            if self.semaphore.acquire_timeout(PUMP_INTERVAL) {
                break;
            }
        }
        pumps
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_DRAWABLE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_pump() {}

    #[test]
    fn index_cycles_modulo_slot_count() {
        let mut pacer = FramePacer::default();
        let mut seen = Vec::new();

        for _ in 0..4 {
            seen.push(pacer.begin_frame(no_pump));
            let done = pacer.completion_signal();
            done();
        }

        assert_eq!(seen, vec![1, 0, 1, 0]);
    }

    #[test]
    fn triple_buffering_visits_every_slot() {
        let mut pacer = FramePacer::new(3);
        let mut seen = Vec::new();

        for _ in 0..6 {
            seen.push(pacer.begin_frame(no_pump));
            pacer.completion_signal()();
        }

        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn zero_slots_is_raised_to_one() {
        let mut pacer = FramePacer::new(0);
        assert_eq!(pacer.slot_count(), 1);
        assert_eq!(pacer.begin_frame(no_pump), 0);
    }

    #[test]
    fn blocks_until_oldest_frame_completes() {
        let mut pacer = FramePacer::new(2);
        let mut pending: Vec<Box<dyn FnOnce() + Send>> = Vec::new();

        for _ in 0..2 {
            pacer.begin_frame(no_pump);
            pending.push(Box::new(pacer.completion_signal()));
        }
        assert_eq!(pacer.in_flight(), 2);

        // The pump stands in for a device poll completing the oldest frame.
        let mut pumps = 0;
        pacer.begin_frame(|| {
            pumps += 1;
            if !pending.is_empty() {
                let done = pending.remove(0);
                done();
            }
        });

        assert!(pumps >= 1);
        assert_eq!(pending.len(), 1);
        assert_eq!(pacer.in_flight(), 2);
    }

    #[test]
    fn completion_from_another_thread_unblocks() {
        let mut pacer = FramePacer::new(1);
        pacer.begin_frame(no_pump);
        let done = pacer.completion_signal();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            done();
        });

        assert_eq!(pacer.begin_frame(no_pump), 0);
        handle.join().unwrap();
        assert_eq!(pacer.in_flight(), 1);
    }

    #[test]
    fn cancel_frees_the_slot_but_keeps_the_index() {
        let mut pacer = FramePacer::new(2);
        assert_eq!(pacer.begin_frame(no_pump), 1);
        pacer.cancel_frame();
        assert_eq!(pacer.in_flight(), 0);
        assert_eq!(pacer.frame_index(), 1);

        // Cancelling twice must not over-release.
        pacer.cancel_frame();
        assert_eq!(pacer.in_flight(), 0);
    }

    #[test]
    fn wait_idle_drains_every_frame() {
        let mut pacer = FramePacer::new(2);
        let mut pending: Vec<Box<dyn FnOnce() + Send>> = Vec::new();
        for _ in 0..2 {
            pacer.begin_frame(no_pump);
            pending.push(Box::new(pacer.completion_signal()));
        }

        pacer.wait_idle(|| {
            if let Some(done) = pending.pop() {
                done();
            }
        });

        assert!(pending.is_empty());
        assert_eq!(pacer.in_flight(), 0);
    }

    #[test]
    fn in_flight_never_exceeds_slot_count() {
        let mut pacer = FramePacer::new(2);
        let mut pending: Vec<Box<dyn FnOnce() + Send>> = Vec::new();

        for frame in 0..50 {
            let index = pacer.begin_frame(|| {
                if !pending.is_empty() {
                    pending.remove(0)();
                }
            });
            assert!(index < 2);

            if frame % 3 == 0 {
                pacer.cancel_frame();
            } else {
                pending.push(Box::new(pacer.completion_signal()));
            }
            assert!(pacer.in_flight() <= 2);
        }
    }

    #[test]
    fn begin_with_open_frame_recycles_its_slot() {
        let mut pacer = FramePacer::new(1);
        pacer.begin_frame(no_pump);
        // Never submitted: the next begin must not deadlock.
        assert_eq!(pacer.begin_frame(no_pump), 0);
        assert_eq!(pacer.in_flight(), 1);
    }
}
