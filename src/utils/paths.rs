//! Lexical path helpers
//!
//! Compilation databases carry paths as plain strings, frequently recorded on
//! another machine. Everything here is string based with `/` separators and
//! never touches the filesystem, except `absolutize` which reads the current
//! directory for relative input.

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Split off the root of a path: `/`, a drive such as `C:/`, or nothing.
fn split_root(path: &str) -> (&str, &str) {
    if let Some(rest) = path.strip_prefix('/') {
        return ("/", rest);
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        if bytes.len() >= 3 && bytes[2] == b'/' {
            return (&path[..3], &path[3..]);
        }
        return (&path[..2], &path[2..]);
    }
    ("", path)
}

pub fn is_absolute(path: &str) -> bool {
    let normalized = normalize_path(path);
    let (root, _) = split_root(&normalized);
    root.ends_with('/') || Path::new(path).is_absolute()
}

/// Non-empty path segments, root excluded.
pub fn segments(path: &str) -> Vec<&str> {
    let (_, rest) = split_root(path);
    rest.split('/').filter(|s| !s.is_empty()).collect()
}

/// Join `file` onto `dir` unless `file` is already absolute.
pub fn join(dir: &str, file: &str) -> String {
    let file = normalize_path(file);
    if is_absolute(&file) {
        return file;
    }
    let dir = normalize_path(dir);
    if dir.is_empty() {
        return file;
    }
    format!("{}/{}", dir.trim_end_matches('/'), file)
}

/// Collapse `.`, `..` and repeated separators without consulting the disk.
pub fn normalize_lexical(path: &str) -> String {
    let normalized = normalize_path(path);
    let (root, rest) = split_root(&normalized);
    let absolute = root.ends_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above an absolute root stays at the root
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (root.is_empty(), body.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => body,
        (false, _) => format!("{}{}", root, body),
    }
}

/// Absolute, normalized form of `path`; relative input is anchored at the
/// current working directory.
pub fn absolutize(path: &str) -> String {
    if is_absolute(path) {
        return normalize_lexical(path);
    }
    let cwd = std::env::current_dir()
        .map(|p| normalize_path(&p.to_string_lossy()))
        .unwrap_or_default();
    normalize_lexical(&join(&cwd, path))
}

/// Relative path from `base` to `path`.
///
/// Returns `None` when the two paths do not share a root (different drives).
pub fn relative_path(path: &str, base: &str) -> Option<String> {
    let path = absolutize(path);
    let base = absolutize(base);
    let (path_root, _) = split_root(&path);
    let (base_root, _) = split_root(&base);
    if !path_root.eq_ignore_ascii_case(base_root) {
        return None;
    }

    let path_parts = segments(&path);
    let base_parts = segments(&base);
    let common = path_parts.iter().zip(base_parts.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; base_parts.len() - common];
    parts.extend_from_slice(&path_parts[common..]);
    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

/// Final segment of a path, ignoring trailing separators.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or("")
}

/// Everything before the final segment, ignoring trailing separators.
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(0) => &trimmed[..1],
        Some(idx) => &trimmed[..idx],
        None => "",
    }
}
