//! Frame timing.
//!
//! - `FrameClock`: clamped delta time and a tick counter, one per render loop
//! - `FpsCounter`: frames-per-second figure published once per second

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
