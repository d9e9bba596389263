//! Search backed by the external `fd` executable.

use super::{SearchProvider, SearchQuery};
use crate::utils::normalize_path;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct FdSearch {
    program: String,
    follow_symlinks: bool,
}

impl Default for FdSearch {
    fn default() -> Self {
        Self { program: "fd".to_string(), follow_symlinks: false }
    }
}

impl FdSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path (e.g. `fdfind` on Debian).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn build_command(&self, query: &SearchQuery<'_>, root: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-HI").arg("--absolute-path");
        cmd.arg(if query.case_insensitive { "--ignore-case" } else { "--case-sensitive" });
        if self.follow_symlinks {
            cmd.arg("--follow");
        }
        if query.regex {
            cmd.arg("--regex");
        } else {
            // Literal fragment matched against the whole path
            cmd.arg("--fixed-strings").arg("--full-path");
        }
        for excluded in query.exclude {
            cmd.arg("--exclude").arg(excluded);
        }
        cmd.arg("--").arg(query.term).arg(root);
        cmd
    }

    fn search_root(&self, query: &SearchQuery<'_>, root: &Path) -> Vec<String> {
        let output = match self.build_command(query, root).output() {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!("Failed to run '{}': {}", self.program, err);
                return Vec::new();
            }
        };
        if !output.status.success() {
            tracing::debug!(
                "'{}' exited with {} for '{}' in {}",
                self.program,
                output.status,
                query.term,
                root.display()
            );
            return Vec::new();
        }

        // fd walks in parallel; sort so repeated runs agree.
        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(normalize_path)
            .collect();
        lines.sort();
        lines
    }
}

impl SearchProvider for FdSearch {
    fn search(&self, query: &SearchQuery<'_>, roots: &[PathBuf]) -> Vec<String> {
        let mut results = Vec::new();
        for root in roots {
            results.extend(self.search_root(query, root));
        }
        tracing::debug!("fd search '{}' -> {} candidates", query.term, results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_literal_command_line() {
        let exclude = vec![".cache".to_string(), "output".to_string()];
        let query = SearchQuery {
            term: "driver/uart.c",
            exclude: &exclude,
            case_insensitive: true,
            regex: false,
        };
        let args = args_of(&FdSearch::new().build_command(&query, Path::new("/src")));
        assert_eq!(
            args,
            vec![
                "-HI",
                "--absolute-path",
                "--ignore-case",
                "--fixed-strings",
                "--full-path",
                "--exclude",
                ".cache",
                "--exclude",
                "output",
                "--",
                "driver/uart.c",
                "/src",
            ]
        );
    }

    #[test]
    fn test_regex_command_line() {
        let query =
            SearchQuery { term: "^uart\\.c$", exclude: &[], case_insensitive: true, regex: true };
        let args = args_of(&FdSearch::new().build_command(&query, Path::new("/src")));
        assert!(args.contains(&"--regex".to_string()));
        assert!(!args.contains(&"--fixed-strings".to_string()));
    }

    #[test]
    fn test_missing_executable_yields_nothing() {
        let query = SearchQuery { term: "x.c", exclude: &[], case_insensitive: true, regex: false };
        let fd = FdSearch::new().program("definitely-not-a-real-fd-binary");
        assert!(fd.search(&query, &[PathBuf::from("/")]).is_empty());
    }
}
