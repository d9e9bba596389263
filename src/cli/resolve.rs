//! Resolve command implementation

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::utils::{source_roots, ResolveOptions};
use crate::resolve::{PathResolver, ResolutionCache};
use crate::search::build_provider;
use crate::utils::paths::absolutize;

#[derive(Args)]
pub struct ResolveArgs {
    /// Stale path to look up
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Directories holding the real sources, searched in order
    #[arg(value_name = "ROOT", required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    #[command(flatten)]
    pub resolve: ResolveOptions,
}

pub fn run(args: ResolveArgs) -> Result<ExitCode> {
    let config = args.resolve.load(Path::new("."))?;
    let roots = source_roots(&args.roots);
    let provider = build_provider(&config);
    let resolver = PathResolver::new(provider.as_ref(), roots, &config);
    let mut cache = ResolutionCache::new();

    let path = absolutize(&args.path);
    match resolver.resolve(&path, &mut cache) {
        Some(found) => {
            println!("{}", found);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No confident match for {}", path);
            Ok(ExitCode::FAILURE)
        }
    }
}
