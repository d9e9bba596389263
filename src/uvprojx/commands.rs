//! Compilation database entries for a parsed project.

use super::build_log::Toolchain;
use super::parser::ParsedProject;
use crate::domain::CompileEntry;
use crate::utils::paths::{join, normalize_lexical};
use std::path::Path;

pub fn generate_entries(
    project: &ParsedProject,
    project_dir: &str,
    toolchain: &Toolchain,
) -> Vec<CompileEntry> {
    project
        .files
        .iter()
        .map(|source| {
            let stem = Path::new(&source.path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("out");

            let mut args = vec![toolchain.compiler.clone(), "-c".to_string(), source.path.clone()];
            args.extend(source.flags.defines.iter().cloned());
            args.extend(source.flags.includes.iter().cloned());
            if let Some(include_dir) = &toolchain.include_dir {
                args.push(format!("-I{}", include_dir));
            }
            args.extend(source.flags.misc.iter().cloned());
            args.push("-o".to_string());
            args.push(format!("obj/{}.o", stem));

            let file = normalize_lexical(&join(project_dir, &source.path));
            CompileEntry::new(project_dir, &file, args)
        })
        .collect()
}
