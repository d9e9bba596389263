//! `.uvprojx` XML parsing and option-layer flattening.

use super::ProjectError;
use crate::domain::FlattenedFlags;
use crate::utils::normalize_path;
use roxmltree::Node;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    C,
    Cpp,
    Asm,
}

impl SourceKind {
    fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
        match ext.as_str() {
            "c" => Some(Self::C),
            "cpp" => Some(Self::Cpp),
            "s" => Some(Self::Asm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as written in the project, with `/` separators.
    pub path: String,
    pub kind: SourceKind,
    pub flags: FlattenedFlags,
}

#[derive(Debug, Clone)]
pub struct ParsedProject {
    pub target_name: String,
    pub files: Vec<SourceFile>,
}

/// Flags contributed by one `VariousControls` element.
#[derive(Debug, Clone, Default)]
struct FlagLayer {
    defines: Vec<String>,
    includes: Vec<String>,
    misc: Vec<String>,
}

impl FlagLayer {
    fn from_controls(controls: Option<Node<'_, '_>>) -> Self {
        let Some(controls) = controls else {
            return Self::default();
        };

        let defines = child_text(&controls, "Define")
            .map(|text| {
                text.split(',')
                    .flat_map(str::split_whitespace)
                    .map(|d| format!("-D{}", d))
                    .collect()
            })
            .unwrap_or_default();

        let includes = child_text(&controls, "IncludePath")
            .map(|text| {
                text.split(';')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| format!("-I{}", normalize_path(p)))
                    .collect()
            })
            .unwrap_or_default();

        let misc = child_text(&controls, "MiscControls")
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self { defines, includes, misc }
    }
}

/// Accumulates layers from broad (target) to specific (file).
#[derive(Debug, Clone, Default)]
struct FlagStack {
    flags: FlattenedFlags,
}

impl FlagStack {
    fn push(&mut self, layer: &FlagLayer) {
        push_unique(&mut self.flags.defines, &layer.defines);
        push_unique(&mut self.flags.includes, &layer.includes);
        self.flags.misc.extend(layer.misc.iter().cloned());
    }
}

fn push_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// C and assembler layers at one level of the hierarchy.
#[derive(Debug, Clone, Default)]
struct LevelFlags {
    c: FlagLayer,
    asm: FlagLayer,
}

impl LevelFlags {
    fn read(node: &Node<'_, '_>, option: &str, ads: &str) -> Self {
        let c = FlagLayer::from_controls(descend(node, &[option, ads, "Cads", "VariousControls"]));
        let asm = FlagLayer::from_controls(descend(node, &[option, ads, "Aads", "VariousControls"]));
        Self { c, asm }
    }

    fn apply(&self, stack: &mut FlagStack, kind: SourceKind) {
        stack.push(&self.c);
        if kind == SourceKind::Asm {
            stack.push(&self.asm);
        }
    }
}

pub fn parse_project(path: &Path, target: Option<&str>) -> Result<ParsedProject, ProjectError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ProjectError::Io { path: path.to_path_buf(), source })?;
    parse_project_str(&content, path, target)
}

pub fn parse_project_str(
    content: &str,
    path: &Path,
    target: Option<&str>,
) -> Result<ParsedProject, ProjectError> {
    let doc = roxmltree::Document::parse(content)
        .map_err(|source| ProjectError::Xml { path: path.to_path_buf(), source })?;
    let project = doc.root_element();

    let targets: Vec<Node<'_, '_>> = child_element(&project, "Targets")
        .map(|t| children_named(&t, "Target").collect())
        .unwrap_or_default();
    let selected = match target {
        Some(name) => targets
            .iter()
            .find(|t| child_text(t, "TargetName").as_deref() == Some(name))
            .copied(),
        None => targets.first().copied(),
    };
    let Some(target_node) = selected else {
        return Err(ProjectError::NoTarget {
            path: path.to_path_buf(),
            name: target.map(str::to_string),
        });
    };
    let target_name = child_text(&target_node, "TargetName").unwrap_or_default();
    tracing::debug!("Using target '{}'", target_name);

    let mut target_flags = LevelFlags::read(&target_node, "TargetOption", "TargetArmAds");
    let c99 = descend(&target_node, &["TargetOption", "TargetArmAds", "Cads", "uC99"])
        .and_then(|n| n.text())
        .is_some_and(|t| t.trim() == "1");
    // armcc spells the C99 switch `--c99`; `-sdt=c99` is not an armcc option
    if c99 {
        target_flags.c.misc.push("--c99".to_string());
    }

    let groups: Vec<Node<'_, '_>> = match child_element(&target_node, "Groups") {
        Some(groups) => children_named(&groups, "Group").collect(),
        None => child_element(&project, "Groups")
            .map(|g| children_named(&g, "Group").collect())
            .unwrap_or_default(),
    };
    if groups.is_empty() {
        tracing::warn!("No groups found in {}", path.display());
    }

    let mut files = Vec::new();
    for group in groups {
        let group_name = child_text(&group, "GroupName").unwrap_or_default();
        let group_flags = LevelFlags::read(&group, "GroupOption", "GroupArmAds");

        let group_files = child_element(&group, "Files")
            .map(|f| children_named(&f, "File").collect::<Vec<_>>())
            .unwrap_or_default();
        for file in group_files {
            let Some(file_path) = child_text(&file, "FilePath") else {
                tracing::warn!("File in group '{}' has no FilePath", group_name);
                continue;
            };
            let file_path = normalize_path(&file_path);
            let Some(kind) = SourceKind::from_path(&file_path) else {
                tracing::debug!("Skipping non-source file: {}", file_path);
                continue;
            };

            let file_flags = LevelFlags::read(&file, "FileOption", "FileArmAds");
            let mut stack = FlagStack::default();
            target_flags.apply(&mut stack, kind);
            group_flags.apply(&mut stack, kind);
            file_flags.apply(&mut stack, kind);

            files.push(SourceFile { path: file_path, kind, flags: stack.flags });
        }
    }

    Ok(ParsedProject { target_name, files })
}

fn child_element<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children_named<'a, 'input: 'a>(
    node: &Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn descend<'a, 'input>(node: &Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    let mut current = *node;
    for name in path {
        current = child_element(&current, name)?;
    }
    Some(current)
}

fn child_text(node: &Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
