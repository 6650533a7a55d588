//! Logging utilities.
//!
//! The loader logs through the `log` facade only. Embedders that already
//! install a logger can ignore this module; standalone tools and tests call
//! [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
