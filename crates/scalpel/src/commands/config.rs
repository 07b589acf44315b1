//! `scalpel config` - print the resolved configuration.

use anyhow::Result;
use scalpel_core::Config;
use std::process::ExitCode;

pub fn run(config: &Config) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}
