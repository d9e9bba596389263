//! In-process recursive search built on the `ignore` walker.

use super::{SearchProvider, SearchQuery};
use crate::utils::normalize_path;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};

/// Walks each root with hidden files included and ignore files disregarded,
/// mirroring `fd -HI`.
#[derive(Debug, Clone, Default)]
pub struct WalkSearch {
    follow_symlinks: bool,
}

enum Matcher {
    Literal { needle: String, case_insensitive: bool },
    Basename(Regex),
}

impl Matcher {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Matcher::Literal { needle, case_insensitive: true } => {
                path.to_lowercase().contains(needle.as_str())
            }
            Matcher::Literal { needle, case_insensitive: false } => path.contains(needle.as_str()),
            Matcher::Basename(re) => re.is_match(crate::utils::paths::basename(path)),
        }
    }
}

impl WalkSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn build_exclude_globset(exclude: &[String]) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude {
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => tracing::warn!("Ignoring invalid exclude pattern '{}': {}", pattern, err),
            }
        }
        builder.build().unwrap_or_else(|_| GlobSet::empty())
    }

    fn build_matcher(query: &SearchQuery<'_>) -> Option<Matcher> {
        if query.regex {
            return match RegexBuilder::new(query.term).case_insensitive(query.case_insensitive).build()
            {
                Ok(re) => Some(Matcher::Basename(re)),
                Err(err) => {
                    tracing::warn!("Invalid search regex '{}': {}", query.term, err);
                    None
                }
            };
        }
        let needle = normalize_path(query.term);
        let needle = if query.case_insensitive { needle.to_lowercase() } else { needle };
        Some(Matcher::Literal { needle, case_insensitive: query.case_insensitive })
    }

    fn walk_root(&self, root: &Path, matcher: &Matcher, excluded: &GlobSet, out: &mut Vec<String>) {
        if !root.is_dir() {
            tracing::debug!("Skipping missing search root {}", root.display());
            return;
        }

        let excluded = excluded.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && excluded.is_match(entry.file_name()))
            });

        for entry_result in builder.build() {
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.depth() == 0 {
                continue;
            }
            let path = normalize_path(&entry.path().to_string_lossy());
            if matcher.is_match(&path) {
                out.push(path);
            }
        }
    }
}

impl SearchProvider for WalkSearch {
    fn search(&self, query: &SearchQuery<'_>, roots: &[PathBuf]) -> Vec<String> {
        let Some(matcher) = Self::build_matcher(query) else {
            return Vec::new();
        };
        let excluded = Self::build_exclude_globset(query.exclude);

        let mut results = Vec::new();
        for root in roots {
            self.walk_root(root, &matcher, &excluded, &mut results);
        }
        tracing::debug!("walk search '{}' -> {} candidates", query.term, results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn query<'a>(term: &'a str, exclude: &'a [String], regex: bool) -> SearchQuery<'a> {
        SearchQuery { term, exclude, case_insensitive: true, regex }
    }

    #[test]
    fn test_literal_search_matches_path_fragment() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "src/driver/uart.c");
        touch(root, "src/other/uart.c");
        touch(root, "Lib/Driver/UART.c");

        let found = WalkSearch::new().search(&query("driver/uart.c", &[], false), &[root.into()]);
        assert_eq!(found.len(), 2, "got {:?}", found);
        assert!(found.iter().all(|p| p.to_lowercase().ends_with("driver/uart.c")));
        // Sorted traversal: "Lib" < "src"
        assert!(found[0].contains("Lib/Driver"));
    }

    #[test]
    fn test_regex_search_is_anchored_on_basename() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "a/uart.c");
        touch(root, "a/uart.c.bak");
        touch(root, "b/my_uart.c");

        let found = WalkSearch::new().search(&query("^uart\\.c$", &[], true), &[root.into()]);
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a/uart.c"));
    }

    #[test]
    fn test_regex_search_ignores_case() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Drivers/UART.C");

        let found =
            WalkSearch::new().search(&query("^uart\\.c$", &[], true), &[tmp.path().into()]);
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("Drivers/UART.C"));

        let exact = SearchQuery { case_insensitive: false, ..query("^uart\\.c$", &[], true) };
        assert!(WalkSearch::new().search(&exact, &[tmp.path().into()]).is_empty());
    }

    #[test]
    fn test_directories_are_candidates() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "drivers/inc/uart.h");
        touch(root, "output/build/drivers/inc/uart.h");

        let exclude = vec!["output".to_string()];
        let found = WalkSearch::new().search(&query("drivers/inc", &exclude, false), &[root.into()]);
        assert_eq!(found.len(), 2, "got {:?}", found);
        assert!(found[0].ends_with("drivers/inc"));
        assert!(found[1].ends_with("drivers/inc/uart.h"));
    }

    #[test]
    fn test_excluded_and_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "output/build/src/main.c");
        touch(root, ".cache/main.c");
        touch(root, ".hidden/main.c");
        touch(root, "src/main.c");

        let exclude = vec![".cache".to_string(), "output".to_string()];
        let found = WalkSearch::new().search(&query("^main\\.c$", &exclude, true), &[root.into()]);
        let names: Vec<&str> = found.iter().map(String::as_str).collect();
        assert_eq!(found.len(), 2, "got {:?}", names);
        assert!(names.iter().any(|p| p.ends_with(".hidden/main.c")));
        assert!(names.iter().any(|p| p.ends_with("src/main.c")));
    }

    #[test]
    fn test_gitignore_is_not_honoured() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join(".gitignore"), "gen/\n").unwrap();
        touch(root, "gen/table.c");

        let found = WalkSearch::new().search(&query("table.c", &[], false), &[root.into()]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_root_and_bad_regex_yield_nothing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(WalkSearch::new().search(&query("x.c", &[], false), &[missing]).is_empty());
        assert!(WalkSearch::new()
            .search(&query("(unclosed", &[], true), &[tmp.path().into()])
            .is_empty());
    }

    #[test]
    fn test_roots_are_visited_in_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(a.path(), "z/x.c");
        touch(b.path(), "a/x.c");

        let found = WalkSearch::new()
            .search(&query("^x\\.c$", &[], true), &[b.path().into(), a.path().into()]);
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("a/x.c"));
        assert!(found[1].ends_with("z/x.c"));
    }
}
