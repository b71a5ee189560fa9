//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface whose textures are the drawables
//! - acquiring drawables, submitting command buffers, presenting
//! - mapping runtime surface errors to a recovery action

mod drawable;
mod error;
mod frame_device;
mod gpu;
mod init;
mod surface;

pub use drawable::Drawable;
pub use error::SurfaceErrorAction;
pub use frame_device::FrameDevice;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::{choose_alpha_mode, choose_surface_format};
