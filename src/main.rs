//! keil-compdb: compilation databases for Keil µVision projects
//!
//! Converts `.uvprojx` projects into `compile_commands.json` and repairs
//! databases whose paths point into a build-output tree instead of the real
//! sources.

use anyhow::Result;
use std::process::ExitCode;

mod cli;
mod config;
mod domain;
mod render;
mod resolve;
mod rewrite;
mod search;
mod utils;
mod uvprojx;

fn main() -> Result<ExitCode> {
    cli::run()
}
