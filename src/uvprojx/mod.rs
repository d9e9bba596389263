//! Keil µVision project conversion
//!
//! Reads a `.uvprojx` file, flattens the target/group/file option layers of
//! every source file, guesses the compiler from the last build log and emits
//! compilation database entries.

use crate::domain::CompileEntry;
use crate::utils::paths::{absolutize, parent};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod build_log;
pub mod commands;
pub mod parser;

pub use build_log::detect_toolchain;
pub use commands::generate_entries;
pub use parser::{parse_project, ParsedProject};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("no target{} found in {path}", target_label(.name))]
    NoTarget { path: PathBuf, name: Option<String> },
}

fn target_label(name: &Option<String>) -> String {
    name.as_ref().map(|n| format!(" named '{}'", n)).unwrap_or_default()
}

/// Options for [`convert_project`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Build output directory relative to the project, holding `*.build_log.htm`.
    pub objects_dir: String,
    /// Target to convert; the first target when `None`.
    pub target: Option<String>,
    /// Compiler executable to use instead of the one guessed from the build log.
    pub compiler: Option<String>,
}

pub fn convert_project(
    uvprojx: &Path,
    options: &ConvertOptions,
) -> Result<(ParsedProject, Vec<CompileEntry>), ProjectError> {
    let project = parse_project(uvprojx, options.target.as_deref())?;

    let project_path = absolutize(&uvprojx.to_string_lossy());
    let project_dir = parent(&project_path).to_string();

    let mut toolchain = detect_toolchain(Path::new(&project_dir), &options.objects_dir);
    if let Some(compiler) = &options.compiler {
        toolchain.compiler = crate::utils::normalize_path(compiler);
    }

    let entries = generate_entries(&project, &project_dir, &toolchain);
    Ok((project, entries))
}
