//! CLI subcommand implementations.

pub mod backup;
pub mod config;
pub mod diff;
pub mod edit;
pub mod find;
pub mod view;
