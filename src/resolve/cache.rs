//! Per-run memo of resolution outcomes.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path carried no build-output marker and is used as-is.
    Unchanged,
    Found(String),
    NotFound,
}

impl Resolution {
    /// The usable path for `original`, if any.
    pub fn path<'a>(&'a self, original: &'a str) -> Option<&'a str> {
        match self {
            Resolution::Unchanged => Some(original),
            Resolution::Found(path) => Some(path),
            Resolution::NotFound => None,
        }
    }
}

/// Outcome memo keyed by the original path string.
///
/// Owned by whoever drives a run and lent to the resolver, so two runs never
/// share state.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, Resolution>,
    hits: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, path: &str) -> Option<&Resolution> {
        let found = self.entries.get(path);
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    pub fn insert(&mut self, path: &str, resolution: Resolution) {
        self.entries.insert(path.to_string(), resolution);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of cached paths that could not be located.
    pub fn not_found(&self) -> usize {
        self.entries.values().filter(|r| **r == Resolution::NotFound).count()
    }
}
