//! Per-directory descriptor construction.
//!
//! Lists the sources directly inside one directory, keeps the entry points
//! and resolves each one's include closure into a [`Target`].

use std::path::Path;

use crate::core::source::{file_stem, normalize_extension, source_path};
use crate::core::{DirectoryDescriptor, Target, Template};
use crate::resolver::{is_entry_point, resolve, ResolveError, DEFAULT_ENTRY_MARKER};
use crate::util::fs::files_with_extension;

/// Builds [`DirectoryDescriptor`]s for directories of one project.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    template: &'a Template,
    extension: &'a str,
    entry_marker: &'a str,
}

impl<'a> DescriptorBuilder<'a> {
    /// Create a builder for sources ending in `extension`.
    pub fn new(template: &'a Template, extension: &'a str) -> Self {
        DescriptorBuilder {
            template,
            extension: normalize_extension(extension),
            entry_marker: DEFAULT_ENTRY_MARKER,
        }
    }

    /// Use a different program-start marker.
    pub fn entry_marker(mut self, marker: &'a str) -> Self {
        self.entry_marker = marker;
        self
    }

    /// Candidate stems: every source directly in `dir`.
    pub fn candidates(&self, dir: &Path) -> Result<Vec<String>, ResolveError> {
        let files = files_with_extension(dir, self.extension)
            .map_err(|e| ResolveError::read(dir, e))?;
        Ok(files
            .iter()
            .filter_map(|path| file_stem(path).map(str::to_string))
            .collect())
    }

    /// Build the descriptor for `dir`.
    ///
    /// Returns `None` when no source in `dir` is an entry point.
    pub fn build(&self, dir: &Path) -> Result<Option<DirectoryDescriptor>, ResolveError> {
        let mut entries = Vec::new();
        for stem in self.candidates(dir)? {
            if is_entry_point(&source_path(dir, &stem, self.extension), self.entry_marker)? {
                entries.push(stem);
            }
        }

        if entries.is_empty() {
            tracing::debug!("{}: no entry points", dir.display());
            return Ok(None);
        }

        let mut targets = Vec::with_capacity(entries.len());
        for stem in entries {
            let dependencies = resolve(&source_path(dir, &stem, self.extension))?;
            targets.push(Target::new(stem, dependencies));
        }

        Ok(Some(DirectoryDescriptor::new(
            dir,
            targets,
            self.extension,
            self.template,
        )))
    }
}

/// Build the descriptor for `dir` with the default entry marker.
pub fn build_descriptor(
    dir: &Path,
    template: &Template,
    extension: &str,
) -> Result<Option<DirectoryDescriptor>, ResolveError> {
    DescriptorBuilder::new(template, extension).build(dir)
}
