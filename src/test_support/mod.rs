//! Test utilities for mkgen unit tests.
//!
//! [`SourceTree`] lays out source files in a temporary directory that is
//! removed when the fixture is dropped.
//!
//! ```rust,ignore
//! let tree = SourceTree::new()
//!     .file("ch01/main.cpp", "#include \"util.h\"\nint main() {}\n")
//!     .file("ch01/util.cpp", "");
//! let desc = build_descriptor(&tree.join("ch01"), &template, "cpp")?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway directory tree of source files.
#[derive(Debug)]
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        SourceTree {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Add a file, creating parent directories as needed.
    pub fn file(self, rel: impl AsRef<Path>, content: &str) -> Self {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// Add an empty directory.
    pub fn dir(self, rel: impl AsRef<Path>) -> Self {
        fs::create_dir_all(self.join(rel)).expect("failed to create fixture dir");
        self
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `rel` inside the tree.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        SourceTree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tree_layout() {
        let tree = SourceTree::new()
            .file("a/b/main.c", "int main(void) {}\n")
            .dir("empty");

        assert!(tree.join("a/b/main.c").is_file());
        assert!(tree.join("empty").is_dir());
        assert!(tree.path().is_dir());
    }
}
