//! Apply command-line overrides on top of file configuration.

use crate::domain::{Config, SearchBackend};

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub exclude_dirs: Option<Vec<String>>,
    pub output_marker: Option<String>,
    pub build_root_marker: Option<String>,
    pub min_score: Option<f64>,
    pub backend: Option<SearchBackend>,
    pub follow_symlinks: bool,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(exclude) = cli.exclude_dirs {
        config.exclude_dirs = exclude;
    }
    if let Some(marker) = cli.output_marker {
        config.output_marker = marker;
    }
    if let Some(marker) = cli.build_root_marker {
        config.build_root_marker = marker;
    }
    if let Some(score) = cli.min_score {
        config.min_score = score;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    config
}
