//! Shared runtime for the Prism GPU samples.
//!
//! This crate owns the platform + GPU pieces every sample uses: the device
//! and surface, the semaphore-gated frame pacing, the example lifecycle and
//! the frame loop that drives it, the arcball camera, input and timing.

pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod pacing;
pub mod time;
pub mod window;

pub use camera::Camera;
pub use coords::{Resolution, ScissorRect, Viewport};
pub use crate::core::{Control, Example, GpuCtx, InitCtx, RenderCtx, UpdateCtx};
pub use device::GpuInit;
pub use window::{Runtime, RuntimeConfig};
