//! Shared utilities for the scalpel workspace:
//! - Logging setup with tracing
//! - Path helpers

pub mod log;
pub mod path;

pub use log::LogLevel;
