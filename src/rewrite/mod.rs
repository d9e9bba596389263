//! Compilation database rewriting
//!
//! Each entry's source file is resolved first and acts as the anchor: only
//! when it is found are `directory`, `file` and the path-like arguments
//! rewritten. Entries are never dropped.

use crate::domain::CompileEntry;
use crate::resolve::{PathResolver, ResolutionCache};
use crate::utils::paths::{
    basename, is_absolute, join, normalize_lexical, parent, relative_path, segments,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of one rewrite run.
#[derive(Debug)]
pub struct RewriteOutcome {
    /// Processed entries, in input order. Shorter than the input only when
    /// the run was interrupted.
    pub entries: Vec<CompileEntry>,
    pub total: usize,
    pub interrupted: bool,
    /// Entries whose source file could not be located.
    pub unresolved: usize,
}

impl RewriteOutcome {
    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.entries.len() == self.total
    }
}

pub struct DatabaseRewriter<'a> {
    resolver: &'a PathResolver<'a>,
    source_extensions: Vec<String>,
}

impl<'a> DatabaseRewriter<'a> {
    pub fn new(resolver: &'a PathResolver<'a>, source_extensions: Vec<String>) -> Self {
        Self { resolver, source_extensions }
    }

    /// Rewrite `entries`, stopping before the next entry once `cancel` is set.
    ///
    /// `on_entry` is called with the zero-based index of every entry before it
    /// is processed.
    pub fn rewrite<F>(
        &self,
        entries: Vec<CompileEntry>,
        cache: &mut ResolutionCache,
        cancel: &AtomicBool,
        mut on_entry: F,
    ) -> RewriteOutcome
    where
        F: FnMut(usize, &CompileEntry),
    {
        let total = entries.len();
        let mut processed = Vec::with_capacity(total);
        let mut unresolved = 0usize;
        let mut interrupted = false;

        for (idx, entry) in entries.into_iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }
            on_entry(idx, &entry);
            let (entry, resolved) = self.rewrite_entry(entry, cache);
            if !resolved {
                unresolved += 1;
            }
            processed.push(entry);
        }

        RewriteOutcome { entries: processed, total, interrupted, unresolved }
    }

    /// Rewrite a single entry; the flag reports whether its file was located.
    ///
    /// Entries lacking `directory` or `file` are passed through and count as
    /// resolved since there is nothing to fix.
    pub fn rewrite_entry(
        &self,
        mut entry: CompileEntry,
        cache: &mut ResolutionCache,
    ) -> (CompileEntry, bool) {
        let original_directory = entry.directory().to_string();
        let original_file = entry.file().to_string();
        if original_directory.is_empty() || original_file.is_empty() {
            return (entry, true);
        }

        let original_abs_file = join(&original_directory, &original_file);
        let Some(found) = self.resolver.resolve(&original_abs_file, cache) else {
            tracing::debug!("Leaving entry for {} untouched", original_file);
            return (entry, false);
        };

        let (new_directory, new_file) =
            relocate(&original_directory, &original_abs_file, &found);
        entry.set_directory(new_directory.clone());
        entry.set_file(new_file);

        if let Some(arguments) = entry.arguments() {
            let rewritten = arguments
                .iter()
                .map(|arg| self.rewrite_argument(arg, &original_directory, &new_directory, cache))
                .collect();
            entry.set_arguments(rewritten);
        }

        (entry, true)
    }

    fn rewrite_argument(
        &self,
        arg: &Value,
        original_directory: &str,
        new_directory: &str,
        cache: &mut ResolutionCache,
    ) -> Value {
        let Some(token) = arg.as_str() else {
            return arg.clone();
        };

        if self.resolver.is_stale(token) {
            let (flag, path) = split_joined_flag(token);
            return match self.resolver.resolve(path, cache) {
                Some(found) => Value::String(format!("{}{}", flag, found)),
                None => arg.clone(),
            };
        }

        if self.is_source_reference(token) && !is_absolute(token) {
            let abs_path = join(original_directory, token);
            let Some(found) = self.resolver.resolve(&abs_path, cache) else {
                return arg.clone();
            };
            let prefix = format!("{}/", new_directory.trim_end_matches('/'));
            if found.starts_with(&prefix) {
                if let Some(rel) = relative_path(&found, new_directory) {
                    return Value::String(rel);
                }
            }
            return Value::String(found);
        }

        arg.clone()
    }

    fn is_source_reference(&self, token: &str) -> bool {
        self.source_extensions.iter().any(|ext| token.ends_with(ext.as_str()))
    }
}

/// Split a joined option such as `-I/abs/inc` into `("-I", "/abs/inc")`.
///
/// Tokens that are not options, or carry no absolute path, come back whole.
fn split_joined_flag(token: &str) -> (&str, &str) {
    if token.starts_with('-') {
        let start = token
            .char_indices()
            .skip(1)
            .map(|(idx, _)| idx)
            .find(|&idx| is_absolute(&token[idx..]));
        if let Some(idx) = start {
            return token.split_at(idx);
        }
    }
    ("", token)
}

/// New `(directory, file)` pair for an entry whose file now lives at `found`.
///
/// The file is assumed to sit as deep below the new directory as it sat below
/// the original one, so the directory is found by climbing that many levels
/// from `found`.
fn relocate(original_directory: &str, original_abs_file: &str, found: &str) -> (String, String) {
    if let Some(rel) = relative_path(original_abs_file, original_directory) {
        let depth = segments(&rel).len().max(1);
        let climb = vec![".."; depth].join("/");
        let new_directory = normalize_lexical(&format!("{}/{}", found, climb));
        if let Some(new_file) = relative_path(found, &new_directory) {
            return (new_directory, new_file);
        }
    }
    (parent(found).to_string(), basename(found).to_string())
}
