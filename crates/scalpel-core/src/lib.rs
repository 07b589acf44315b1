//! Core building blocks for scalpel.
//!
//! This crate provides the pieces everything else is built on:
//! - Layered configuration with typed value access
//! - The encoding codec (byte-order-mark detection, decode/encode)
//! - [`TextDocument`], a terminator-preserving line sequence
//! - Unified line diffs

pub mod config;
pub mod diff;
pub mod document;
pub mod encoding;
pub mod error;

pub use config::Config;
pub use document::TextDocument;
pub use encoding::EncodingTag;
pub use error::{CoreError, CoreResult};
