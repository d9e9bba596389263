//! Shared CLI utilities.

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{Config, SearchBackend};
use crate::utils::paths::absolutize;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// Resolution options shared by `fix` and `resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveOptions {
    /// Path to config file (keil-compdb.toml or .keil-compdb.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory names to skip while searching (comma-separated)
    #[arg(short = 'e', long, value_name = "DIRS")]
    pub exclude: Option<String>,

    /// Minimum similarity score for accepting a match
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Search backend: walk (built-in) or fd
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<SearchBackend>,

    /// Path fragment marking the build-output tree
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    /// Path fragment after which the source-relative part begins
    #[arg(long, value_name = "TEXT")]
    pub build_root_marker: Option<String>,

    /// Follow symbolic links when searching
    #[arg(long)]
    pub follow_symlinks: bool,
}

impl ResolveOptions {
    /// Config given with `--config` or discovered in `search_dir`, with
    /// command-line values applied on top.
    pub fn load(&self, search_dir: &Path) -> Result<Config> {
        let config = load_config(search_dir, self.config.as_deref())?;
        let overrides = CliOverrides {
            exclude_dirs: parse_csv(&self.exclude),
            output_marker: self.marker.clone(),
            build_root_marker: self.build_root_marker.clone(),
            min_score: self.min_score,
            backend: self.backend,
            follow_symlinks: self.follow_symlinks,
        };
        Ok(merge_cli_with_config(config, overrides))
    }
}

/// Directory containing `file`, `.` for a bare file name.
pub fn parent_dir(file: &Path) -> &Path {
    file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
}

/// Absolute form of every source root, in the order given.
///
/// Roots are not required to exist; a missing one simply never matches.
pub fn source_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .map(|root| {
            let abs = PathBuf::from(absolutize(&root.to_string_lossy()));
            if !abs.is_dir() {
                tracing::warn!("Source root is not a directory: {}", abs.display());
            }
            abs
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        assert_eq!(parse_csv(&None), None);
        assert_eq!(
            parse_csv(&Some(" .cache, ,output ".to_string())),
            Some(vec![".cache".to_string(), "output".to_string()])
        );
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("compile_commands.json")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/w/build/cdb.json")), Path::new("/w/build"));
    }

    #[test]
    fn test_source_roots_are_absolute_and_ordered() {
        let roots = source_roots(&[PathBuf::from("b"), PathBuf::from("/a/../c")]);
        assert!(roots[0].is_absolute());
        assert!(roots[0].ends_with("b"));
        assert_eq!(roots[1], PathBuf::from("/c"));
    }
}
