//! Two-strategy path resolver.

use super::cache::{Resolution, ResolutionCache};
use super::score::best_match;
use crate::domain::Config;
use crate::search::{SearchProvider, SearchQuery};
use crate::utils::normalize_path;
use crate::utils::paths::{basename, parent};
use std::path::PathBuf;

/// Maps stale build-output paths to files under the configured source roots.
///
/// Strategy A searches for `<parent>/<basename>`; strategy B falls back to the
/// bare basename. Each root is tried in order and the first candidate scoring
/// at least `min_score` is accepted.
pub struct PathResolver<'a> {
    provider: &'a dyn SearchProvider,
    roots: Vec<PathBuf>,
    exclude_dirs: Vec<String>,
    output_marker: String,
    build_root_marker: String,
    min_score: f64,
    fallback_segments: usize,
}

impl<'a> PathResolver<'a> {
    pub fn new(provider: &'a dyn SearchProvider, roots: Vec<PathBuf>, config: &Config) -> Self {
        Self {
            provider,
            roots,
            exclude_dirs: config.exclude_dirs.clone(),
            output_marker: config.output_marker.clone(),
            build_root_marker: config.build_root_marker.clone(),
            min_score: config.min_score,
            fallback_segments: config.fallback_segments,
        }
    }

    /// Whether `path` points into the build-output tree.
    pub fn is_stale(&self, path: &str) -> bool {
        !self.output_marker.is_empty() && normalize_path(path).contains(&self.output_marker)
    }

    /// Resolve `path`, consulting and filling `cache`.
    ///
    /// Paths without the output marker are returned unchanged. `None` means
    /// no candidate cleared the confidence threshold.
    pub fn resolve(&self, path: &str, cache: &mut ResolutionCache) -> Option<String> {
        if let Some(cached) = cache.get(path) {
            return cached.path(path).map(str::to_string);
        }

        if !self.is_stale(path) {
            cache.insert(path, Resolution::Unchanged);
            return Some(path.to_string());
        }

        let resolution = match self.search_specific(path).or_else(|| self.search_basename(path)) {
            Some(found) => {
                tracing::debug!("Resolved {} -> {}", path, found);
                Resolution::Found(found)
            }
            None => {
                tracing::debug!("No confident match for {}", path);
                Resolution::NotFound
            }
        };
        let result = resolution.path(path).map(str::to_string);
        cache.insert(path, resolution);
        result
    }

    /// Strategy A: match on the last two segments.
    fn search_specific(&self, path: &str) -> Option<String> {
        let normalized = normalize_path(path);
        let trimmed = normalized.trim_end_matches('/');
        let parent_dir = parent(trimmed);
        if parent_dir.is_empty() || parent_dir == "/" {
            return None;
        }
        let term = format!("{}/{}", basename(parent_dir), basename(trimmed));

        let query = SearchQuery {
            term: &term,
            exclude: &self.exclude_dirs,
            case_insensitive: true,
            regex: false,
        };
        self.search_roots(&query, path, |candidate| candidate.ends_with(&term))
    }

    /// Strategy B: match on the exact basename.
    fn search_basename(&self, path: &str) -> Option<String> {
        let normalized = normalize_path(path);
        let name = basename(&normalized);
        if name.is_empty() {
            return None;
        }
        let pattern = format!("^{}$", regex::escape(name));

        let query = SearchQuery {
            term: &pattern,
            exclude: &self.exclude_dirs,
            case_insensitive: true,
            regex: true,
        };
        self.search_roots(&query, path, |_| true)
    }

    fn search_roots<F>(&self, query: &SearchQuery<'_>, original: &str, keep: F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        for root in &self.roots {
            let candidates: Vec<String> = self
                .provider
                .search(query, std::slice::from_ref(root))
                .into_iter()
                .filter(|c| keep(c.as_str()))
                .collect();

            let Some((found, score)) =
                best_match(&candidates, original, &self.build_root_marker, self.fallback_segments)
            else {
                continue;
            };
            if score >= self.min_score {
                return Some(found);
            }
            tracing::debug!(
                "Best candidate {} for {} scored {:.2} (< {:.2}) in {}",
                found,
                original,
                score,
                self.min_score,
                root.display()
            );
        }
        None
    }
}
