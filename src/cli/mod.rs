//! Command-line interface for keil-compdb
//!
//! Provides `convert`, `fix` and `resolve` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod convert;
mod fix;
mod resolve;
mod utils;

/// Generate and repair compilation databases for Keil µVision projects
#[derive(Parser)]
#[command(name = "keil-compdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a .uvprojx project into compile_commands.json
    Convert(convert::ConvertArgs),

    /// Repoint a compilation database from the build-output tree to the real sources
    Fix(fix::FixArgs),

    /// Resolve a single build-output path against the source roots
    Resolve(resolve::ResolveArgs),
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Convert(args) => convert::run(args),
        Commands::Fix(args) => fix::run(args),
        Commands::Resolve(args) => resolve::run(args),
    }
}
