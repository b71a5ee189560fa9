//! Triangle sample: indexed vertex-coloured geometry, per-slot uniforms and
//! an arcball camera.

mod geometry;
mod triangle;

use anyhow::Result;
use prism_common::logging::{init_logging, LoggingConfig};
use prism_common::{GpuInit, Runtime, RuntimeConfig};

use triangle::{Options, Triangle};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let example = Triangle::new(Options::default());
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), example)
}
