use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Counting semaphore backed by a bounded channel of unit tokens.
///
/// The channel holds one token per available permit: acquiring receives a
/// token, releasing sends one back. Because the channel is bounded by the
/// capacity, a release that would exceed it is detected and dropped.
///
/// Cloning yields another handle to the same permits.
#[derive(Debug, Clone)]
pub struct FrameSemaphore {
    tokens_tx: Sender<()>,
    tokens_rx: Receiver<()>,
    capacity: usize,
}

impl FrameSemaphore {
    /// Creates a semaphore with `capacity` permits, all initially available.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tokens_tx, tokens_rx) = crossbeam_channel::bounded(capacity);

        for _ in 0..capacity {
            // Cannot fail: the channel is empty and sized to `capacity`.
            let _ = tokens_tx.try_send(());
        }

        Self {
            tokens_tx,
            tokens_rx,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently available.
    #[inline]
    pub fn available(&self) -> usize {
        self.tokens_rx.len()
    }

    /// Blocks until a permit is available.
    pub fn acquire(&self) {
        // `self` owns a sender, so the channel cannot disconnect while we wait.
        let _ = self.tokens_rx.recv();
    }

    /// Takes a permit if one is available right now.
    pub fn try_acquire(&self) -> bool {
        self.tokens_rx.try_recv().is_ok()
    }

    /// Waits up to `timeout` for a permit. Returns `false` on timeout.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        self.tokens_rx.recv_timeout(timeout).is_ok()
    }

    /// Returns a permit.
    pub fn release(&self) {
        release_token(&self.tokens_tx);
    }

    /// Returns a closure that releases one permit when called.
    ///
    /// The closure owns its own sender and may run on any thread, after the
    /// semaphore itself has been dropped.
    pub fn signal(&self) -> impl FnOnce() + Send + 'static + use<> {
        let tokens_tx = self.tokens_tx.clone();
        move || release_token(&tokens_tx)
    }
}

fn release_token(tokens_tx: &Sender<()>) {
    match tokens_tx.try_send(()) {
        Ok(()) => {}
        Err(TrySendError::Full(())) => {
            log::warn!("frame semaphore released above its capacity; ignoring extra permit");
        }
        Err(TrySendError::Disconnected(())) => {
            log::trace!("frame semaphore dropped before completion signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_all_permits() {
        let sem = FrameSemaphore::new(3);
        assert_eq!(sem.capacity(), 3);
        assert_eq!(sem.available(), 3);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let sem = FrameSemaphore::new(0);
        assert_eq!(sem.capacity(), 1);
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
    }

    #[test]
    fn try_acquire_exhausts_permits() {
        let sem = FrameSemaphore::new(2);
        assert!(sem.try_acquire());
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn release_restores_a_permit() {
        let sem = FrameSemaphore::new(1);
        sem.acquire();
        assert!(!sem.try_acquire());
        sem.release();
        assert!(sem.try_acquire());
    }

    #[test]
    fn over_release_is_dropped() {
        let sem = FrameSemaphore::new(2);
        sem.release();
        sem.release();
        assert_eq!(sem.available(), 2);
    }

    #[test]
    fn acquire_timeout_gives_up() {
        let sem = FrameSemaphore::new(1);
        assert!(sem.acquire_timeout(Duration::from_millis(1)));
        assert!(!sem.acquire_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn signal_releases_from_another_thread() {
        let sem = FrameSemaphore::new(1);
        sem.acquire();

        let signal = sem.signal();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            signal();
        });

        sem.acquire();
        handle.join().unwrap();
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn signal_outliving_semaphore_is_harmless() {
        let sem = FrameSemaphore::new(1);
        let signal = sem.signal();
        drop(sem);
        signal();
    }
}
