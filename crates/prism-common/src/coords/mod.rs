//! Screen-space types shared by the frame loop and the samples.
//!
//! All sizes are physical pixels with the origin at the top-left.

mod resolution;
mod viewport;

pub use resolution::Resolution;
pub use viewport::{ScissorRect, Viewport};
