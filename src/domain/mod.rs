//! Core domain types shared by the converter and the path fixer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Directories never descended into while searching source roots.
pub fn default_exclude_dirs() -> &'static [&'static str] {
    &[".cache", "output"]
}

/// Extensions that mark a relative compiler argument as a source/header reference.
pub fn default_source_extensions() -> &'static [&'static str] {
    &[".c", ".cpp", ".h", ".S"]
}

/// Which filesystem search implementation backs the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// In-process recursive walk.
    #[default]
    Walk,
    /// External `fd` executable.
    Fd,
}

impl std::str::FromStr for SearchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walk" => Ok(Self::Walk),
            "fd" => Ok(Self::Fd),
            other => Err(format!("Invalid search backend '{}' (expected 'walk' or 'fd')", other)),
        }
    }
}

/// Tool configuration after file loading and CLI merging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_dirs: Vec<String>,
    /// Substring marking a path as living inside the build-output tree.
    pub output_marker: String,
    /// Substring after which the meaningful source-relative suffix starts.
    pub build_root_marker: String,
    pub min_score: f64,
    /// Trailing segments compared when `build_root_marker` is absent.
    pub fallback_segments: usize,
    #[serde(deserialize_with = "extension_list")]
    pub source_extensions: Vec<String>,
    pub output_suffix: String,
    pub backend: SearchBackend,
    /// Executable run by the `fd` backend.
    pub fd_program: String,
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs().iter().map(|s| s.to_string()).collect(),
            output_marker: "output/".to_string(),
            build_root_marker: "output/build/".to_string(),
            min_score: 1.5,
            fallback_segments: 4,
            source_extensions: default_source_extensions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_suffix: "_fixed".to_string(),
            backend: SearchBackend::Walk,
            fd_program: "fd".to_string(),
            follow_symlinks: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    Csv(String),
    List(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::Csv(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        StringOrList::List(v) => v,
    };
    Ok(items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
}

fn extension_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = string_or_list(deserializer)?;
    Ok(items
        .into_iter()
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{}", ext) })
        .collect())
}

/// One record of a compilation database.
///
/// Stored as the raw JSON object so fields other than `directory`, `file`
/// and `arguments` survive a rewrite in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileEntry {
    fields: Map<String, Value>,
}

impl CompileEntry {
    pub fn new(directory: &str, file: &str, arguments: Vec<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("directory".to_string(), Value::String(directory.to_string()));
        fields.insert("file".to_string(), Value::String(file.to_string()));
        fields.insert(
            "arguments".to_string(),
            Value::Array(arguments.into_iter().map(Value::String).collect()),
        );
        Self { fields }
    }

    /// The `directory` field, or `""` when missing or not a string.
    pub fn directory(&self) -> &str {
        self.fields.get("directory").and_then(Value::as_str).unwrap_or("")
    }

    /// The `file` field, or `""` when missing or not a string.
    pub fn file(&self) -> &str {
        self.fields.get("file").and_then(Value::as_str).unwrap_or("")
    }

    pub fn arguments(&self) -> Option<&Vec<Value>> {
        self.fields.get("arguments").and_then(Value::as_array)
    }

    pub fn set_directory(&mut self, directory: String) {
        self.fields.insert("directory".to_string(), Value::String(directory));
    }

    pub fn set_file(&mut self, file: String) {
        self.fields.insert("file".to_string(), Value::String(file));
    }

    pub fn set_arguments(&mut self, arguments: Vec<Value>) {
        self.fields.insert("arguments".to_string(), Value::Array(arguments));
    }
}

/// Preprocessor and compiler flags of one source file after layer merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedFlags {
    pub defines: Vec<String>,
    pub includes: Vec<String>,
    pub misc: Vec<String>,
}
