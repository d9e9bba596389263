//! Compiler discovery from µVision build logs.

use crate::utils::normalize_path;
use crate::utils::paths::parent;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_COMPILER: &str = "armcc";
const TOOLCHAIN_MARKER: &str = "Toolchain Path:";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Compiler used for emitted commands plus its bundled include directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: String,
    pub include_dir: Option<String>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self { compiler: DEFAULT_COMPILER.to_string(), include_dir: None }
    }
}

/// First `*.build_log.htm` in `<project_dir>/<objects_dir>`, by name.
pub fn find_build_log(project_dir: &Path, objects_dir: &str) -> Option<PathBuf> {
    let dir = project_dir.join(objects_dir);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => {
            tracing::warn!(
                "Objects directory not found at {}; skipping toolchain detection",
                dir.display()
            );
            return None;
        }
    };

    let mut logs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".build_log.htm"))
        })
        .collect();
    logs.sort();
    logs.into_iter().next()
}

/// Toolchain directory recorded on the first `Toolchain Path:` line.
///
/// Logs written by µVision are often not UTF-8, so invalid bytes are replaced.
pub fn toolchain_path_from_log(log: &Path) -> Option<String> {
    let bytes = fs::read(log).ok()?;
    let content = String::from_utf8_lossy(&bytes);
    let line = content.lines().find(|line| line.contains(TOOLCHAIN_MARKER))?;
    let raw = line.split_once(TOOLCHAIN_MARKER)?.1;
    let value = HTML_TAG.replace_all(raw, "");
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(normalize_path(value))
    }
}

/// Guess the compiler for a project; falls back to plain `armcc`.
pub fn detect_toolchain(project_dir: &Path, objects_dir: &str) -> Toolchain {
    let Some(log) = find_build_log(project_dir, objects_dir) else {
        tracing::warn!("No build log found; using '{}' as compiler", DEFAULT_COMPILER);
        return Toolchain::default();
    };
    let Some(toolchain_dir) = toolchain_path_from_log(&log) else {
        tracing::warn!("No toolchain path in {}; using '{}'", log.display(), DEFAULT_COMPILER);
        return Toolchain::default();
    };
    tracing::info!("Found toolchain path: {}", toolchain_dir);

    let toolchain_dir = toolchain_dir.trim_end_matches('/');
    let compiler = format!("{}/armcc.exe", toolchain_dir);
    let include_dir = format!("{}/include", parent(toolchain_dir));
    let include_dir = if Path::new(&include_dir).is_dir() {
        Some(include_dir)
    } else {
        tracing::warn!("Compiler include directory not found: {}", include_dir);
        None
    };

    Toolchain { compiler, include_dir }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_toolchain_from_log() {
        let tmp = TempDir::new().unwrap();
        let objects = tmp.path().join("Objects");
        fs::create_dir_all(&objects).unwrap();
        fs::write(
            objects.join("app.build_log.htm"),
            "<pre>\n<h2>Tool Versions:</h2>\nToolchain Path:  C:\\Keil_v5\\ARM\\ARMCC\\Bin\n</pre>\n",
        )
        .unwrap();

        let toolchain = detect_toolchain(tmp.path(), "Objects");
        assert_eq!(toolchain.compiler, "C:/Keil_v5/ARM/ARMCC/Bin/armcc.exe");
        assert_eq!(toolchain.include_dir, None);
    }

    #[test]
    fn test_include_dir_next_to_bin() {
        let tmp = TempDir::new().unwrap();
        let armcc = tmp.path().join("ARMCC");
        fs::create_dir_all(armcc.join("bin")).unwrap();
        fs::create_dir_all(armcc.join("include")).unwrap();
        let objects = tmp.path().join("proj/Objects");
        fs::create_dir_all(&objects).unwrap();
        let bin = normalize_path(&armcc.join("bin").to_string_lossy());
        fs::write(objects.join("x.build_log.htm"), format!("Toolchain Path: {}<br>\n", bin)).unwrap();

        let toolchain = detect_toolchain(&tmp.path().join("proj"), "Objects");
        assert_eq!(toolchain.compiler, format!("{}/armcc.exe", bin));
        assert_eq!(
            toolchain.include_dir,
            Some(format!("{}/include", normalize_path(&armcc.to_string_lossy())))
        );
    }

    #[test]
    fn test_missing_objects_dir_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(detect_toolchain(tmp.path(), "Objects"), Toolchain::default());
    }

    #[test]
    fn test_log_without_marker() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("a.build_log.htm");
        fs::write(&log, [0xffu8, 0xfe, b'\n', b'x']).unwrap();
        assert_eq!(toolchain_path_from_log(&log), None);
    }
}
