//! Frame pacing.
//!
//! Bounds the number of frames the CPU may record ahead of the GPU. A counting
//! semaphore sized to the drawable pool is taken before a frame begins and
//! given back from the queue's completion callback once the GPU has consumed
//! the frame's command buffer.
//!
//! Intended usage (one pacer per render loop):
//! - `begin_frame(pump)` before touching per-slot resources
//! - hand `completion_signal()` to the submission
//! - `cancel_frame()` if the frame is abandoned before submission

mod pacer;
mod semaphore;

pub use pacer::{FramePacer, DEFAULT_DRAWABLE_COUNT};
pub use semaphore::FrameSemaphore;
