//! Filesystem search over source roots
//!
//! The resolver only needs "find files like this under these roots"; the
//! [`SearchProvider`] trait hides whether that is an in-process walk or an
//! external `fd` process. Providers never fail: any problem is logged and
//! reported as zero candidates.

use crate::domain::{Config, SearchBackend};
use std::path::PathBuf;

pub mod fd;
pub mod walker;

pub use fd::FdSearch;
pub use walker::WalkSearch;

/// One search request.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    /// Literal path fragment, or a regex when `regex` is set.
    pub term: &'a str,
    /// Directory-name globs pruned from traversal.
    pub exclude: &'a [String],
    pub case_insensitive: bool,
    /// Match `term` as a regex against the basename instead of as a
    /// substring of the whole path.
    pub regex: bool,
}

pub trait SearchProvider {
    /// Candidate files and directories under `roots`, roots visited in order.
    ///
    /// Returned paths are absolute with `/` separators. Ordering is stable for
    /// an unchanged filesystem.
    fn search(&self, query: &SearchQuery<'_>, roots: &[PathBuf]) -> Vec<String>;
}

pub fn build_provider(config: &Config) -> Box<dyn SearchProvider> {
    match config.backend {
        SearchBackend::Walk => Box::new(WalkSearch::new().follow_symlinks(config.follow_symlinks)),
        SearchBackend::Fd => Box::new(
            FdSearch::new()
                .program(config.fd_program.clone())
                .follow_symlinks(config.follow_symlinks),
        ),
    }
}
