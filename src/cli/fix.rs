//! Fix command implementation

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::utils::{parent_dir, source_roots, ResolveOptions};
use crate::render::{fixed_output_path, read_database, write_database};
use crate::resolve::{PathResolver, ResolutionCache};
use crate::rewrite::{DatabaseRewriter, RewriteOutcome};
use crate::search::build_provider;

/// Exit status used when the run was cut short by a signal.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Args)]
pub struct FixArgs {
    /// compile_commands.json to repair
    #[arg(value_name = "COMPDB")]
    pub compdb: PathBuf,

    /// Directories holding the real sources, searched in order
    #[arg(value_name = "ROOT", required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Output file (default: <COMPDB stem>_fixed.json next to the input)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub resolve: ResolveOptions,
}

pub fn run(args: FixArgs) -> Result<ExitCode> {
    let config = args.resolve.load(parent_dir(&args.compdb))?;
    let roots = source_roots(&args.roots);

    println!("Loading {} ...", args.compdb.display());
    let entries = read_database(&args.compdb)?;
    let total = entries.len();
    println!("Total entries to process: {}", total);

    let cancel = Arc::new(AtomicBool::new(false));
    for signal in signal_hook::consts::TERM_SIGNALS {
        signal_hook::flag::register(*signal, Arc::clone(&cancel))
            .context("Failed to install interrupt handler")?;
    }

    let provider = build_provider(&config);
    let resolver = PathResolver::new(provider.as_ref(), roots, &config);
    let rewriter = DatabaseRewriter::new(&resolver, config.source_extensions.clone());
    let mut cache = ResolutionCache::new();

    let progress = progress_bar(total as u64, args.no_progress);
    let outcome = rewriter.rewrite(entries, &mut cache, &cancel, |idx, entry| {
        progress.set_position(idx as u64);
        progress.set_message(entry.file().to_string());
        tracing::debug!("[{}/{}] Processing: {}", idx + 1, total, entry.file());
    });
    progress.finish_and_clear();

    if outcome.interrupted {
        eprintln!("Interrupted. Saving partial results...");
    }

    let out_file = args
        .output
        .clone()
        .unwrap_or_else(|| fixed_output_path(&args.compdb, &config.output_suffix));
    let mut stdout = io::stdout().lock();
    let status = save_outcome(&mut stdout, &outcome, &cache, &args.compdb, &out_file)?;
    Ok(ExitCode::from(status))
}

/// Write the processed entries to `out_file` and print the run summary.
///
/// Returns the process exit status: 0 for a complete run, 130 when it was
/// interrupted and only a prefix was saved.
fn save_outcome(
    out: &mut impl Write,
    outcome: &RewriteOutcome,
    cache: &ResolutionCache,
    compdb: &Path,
    out_file: &Path,
) -> Result<u8> {
    writeln!(
        out,
        "Saving {} processed entries to {} ...",
        outcome.entries.len(),
        out_file.display()
    )?;
    write_database(out_file, &outcome.entries)?;

    writeln!(out)?;
    writeln!(out, "Statistics:")?;
    writeln!(out, "  Entries processed:   {}/{}", outcome.entries.len(), outcome.total)?;
    writeln!(out, "  Entries unresolved:  {}", outcome.unresolved)?;
    writeln!(out, "  Paths looked up:     {}", cache.len())?;
    writeln!(out, "  Paths not found:     {}", cache.not_found())?;
    writeln!(out, "  Cache hits:          {}", cache.hits())?;

    if outcome.is_complete() {
        writeln!(out, "Successfully fixed {}.", compdb.display())?;
        Ok(0)
    } else {
        writeln!(out, "Processing was interrupted. The output file contains partial results.")?;
        Ok(EXIT_INTERRUPTED)
    }
}

fn progress_bar(total: u64, disabled: bool) -> ProgressBar {
    if disabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template("[{pos}/{len}] {bar:30} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
