//! Convert command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::render::write_database;
use crate::uvprojx::{convert_project, ConvertOptions};

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to the .uvprojx project file
    #[arg(value_name = "UVPROJX")]
    pub uvprojx: PathBuf,

    /// Output path
    #[arg(short, long, value_name = "FILE", default_value = "compile_commands.json")]
    pub output: PathBuf,

    /// Objects directory holding the build log, relative to the project
    #[arg(short = 'd', long, value_name = "DIR", default_value = "Objects")]
    pub objects: String,

    /// Target to convert (default: first target)
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,

    /// Compiler to put in each command instead of the one found in the build log
    #[arg(long, value_name = "PATH")]
    pub compiler: Option<String>,
}

pub fn run(args: ConvertArgs) -> Result<ExitCode> {
    let options = ConvertOptions {
        objects_dir: args.objects.clone(),
        target: args.target.clone(),
        compiler: args.compiler.clone(),
    };
    let (project, entries) = convert_project(&args.uvprojx, &options)
        .with_context(|| format!("Failed to convert {}", args.uvprojx.display()))?;

    write_database(&args.output, &entries)?;
    println!(
        "Wrote {} entries for target '{}' to {}",
        entries.len(),
        project.target_name,
        args.output.display()
    );
    Ok(ExitCode::SUCCESS)
}
