//! Logging utilities.
//!
//! Centralizes logger initialization behind the `log` facade; `env_logger`
//! is the only backend.

mod init;

pub use init::{init_logging, LoggingConfig};
