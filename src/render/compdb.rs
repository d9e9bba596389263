//! Compilation database (de)serialization.

use crate::domain::CompileEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompdbError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse compilation database {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize compilation database: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn read_database(path: &Path) -> Result<Vec<CompileEntry>, CompdbError> {
    let content = fs::read_to_string(path)
        .map_err(|source| CompdbError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| CompdbError::Parse { path: path.to_path_buf(), source })
}

/// Pretty JSON with two-space indentation and a trailing newline.
pub fn render_database(entries: &[CompileEntry]) -> Result<String, CompdbError> {
    let mut text = serde_json::to_string_pretty(entries)?;
    text.push('\n');
    Ok(text)
}

pub fn write_database(path: &Path, entries: &[CompileEntry]) -> Result<(), CompdbError> {
    let text = render_database(entries)?;
    fs::write(path, text).map_err(|source| CompdbError::Write { path: path.to_path_buf(), source })
}

/// `dir/name.json` -> `dir/name<suffix>.json`.
pub fn fixed_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("compile_commands");
    input.with_file_name(format!("{}{}.json", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_output_path() {
        assert_eq!(
            fixed_output_path(Path::new("/w/compile_commands.json"), "_fixed"),
            PathBuf::from("/w/compile_commands_fixed.json")
        );
        assert_eq!(fixed_output_path(Path::new("cdb"), "_fixed"), PathBuf::from("cdb_fixed.json"));
    }

    #[test]
    fn test_render_uses_two_space_indent() {
        let entries = vec![CompileEntry::new("/w", "/w/a.c", vec!["cc".to_string()])];
        let text = render_database(&entries).unwrap();
        let expected = "[\n  {\n    \"directory\": \"/w\",\n    \"file\": \"/w/a.c\",\n    \"arguments\": [\n      \"cc\"\n    ]\n  }\n]\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_read_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_database(&path), Err(CompdbError::Parse { .. })));
        assert!(matches!(
            read_database(&tmp.path().join("missing.json")),
            Err(CompdbError::Read { .. })
        ));
    }

    #[test]
    fn test_write_then_read_keeps_extra_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let entry: CompileEntry =
            serde_json::from_value(json!({"file": "a.c", "directory": "/w", "output": "a.o"}))
                .unwrap();
        write_database(&path, std::slice::from_ref(&entry)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("\"file\"").unwrap() < text.find("\"directory\"").unwrap());
        assert_eq!(read_database(&path).unwrap(), vec![entry]);
    }
}
