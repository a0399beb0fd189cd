//! Target definitions - what gets compiled.
//!
//! A [`Target`] is one executable built from an entry-point source file and
//! every project-local file its includes reach. A [`DirectoryDescriptor`]
//! groups the targets of one directory with the compiler settings needed to
//! build them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::source::source_name;
use crate::core::template::Template;

/// A compilable unit rooted at an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Stem of the entry-point file (`main` for `main.cpp`).
    pub name: String,

    /// File names (with extension) reachable through quoted includes.
    ///
    /// Ordered so rendering is deterministic; consumers must treat it as a set.
    pub dependencies: BTreeSet<String>,
}

impl Target {
    /// Create a new target.
    pub fn new(name: impl Into<String>, dependencies: BTreeSet<String>) -> Self {
        Target {
            name: name.into(),
            dependencies,
        }
    }

    /// Every source file this target compiles: its own source first, then
    /// its dependencies, with the entry source never listed twice.
    pub fn sources(&self, ext: &str) -> Vec<String> {
        let own = source_name(&self.name, ext);
        let mut sources = Vec::with_capacity(self.dependencies.len() + 1);
        sources.push(own.clone());
        sources.extend(self.dependencies.iter().filter(|d| **d != own).cloned());
        sources
    }
}

/// Per-directory record handed to a descriptor writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryDescriptor {
    /// Directory the build file belongs in
    pub directory: PathBuf,

    /// Targets, sorted by name
    pub targets: Vec<Target>,

    /// Source extension the targets were resolved with (no leading dot)
    pub extension: String,

    /// Compiler executable
    pub compiler: String,

    /// Compiler flags
    pub flags: Vec<String>,

    /// Libraries to link
    pub libraries: Vec<String>,
}

impl DirectoryDescriptor {
    /// Assemble a descriptor from resolved targets and the shared template.
    pub fn new(
        directory: impl Into<PathBuf>,
        mut targets: Vec<Target>,
        extension: &str,
        template: &Template,
    ) -> Self {
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        DirectoryDescriptor {
            directory: directory.into(),
            targets,
            extension: extension.to_string(),
            compiler: template.compiler.clone(),
            flags: template.flags.clone(),
            libraries: template.libraries.clone(),
        }
    }

    /// Directory this descriptor describes.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Names of all targets.
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}
