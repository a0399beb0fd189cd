//! Source file naming.
//!
//! Source files are never held as long-lived objects. A file is named by its
//! stem plus the project's source extension and joined onto a directory
//! whenever it needs to be opened.

use std::path::{Path, PathBuf};

/// Strip an optional leading dot from a configured extension.
///
/// `".cpp"` and `"cpp"` both normalize to `"cpp"`.
pub fn normalize_extension(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

/// File name for a stem with the given extension (`main` + `cpp` -> `main.cpp`).
pub fn source_name(stem: &str, ext: &str) -> String {
    let ext = normalize_extension(ext);
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, ext)
    }
}

/// Path of a source file inside `dir`.
pub fn source_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(source_name(stem, ext))
}

/// Stem of a path, if it has a valid UTF-8 one.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Whether `path` carries the extension `ext` (compared without the dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let ext = normalize_extension(ext);
    match path.extension().and_then(|e| e.to_str()) {
        Some(found) => found == ext,
        None => ext.is_empty(),
    }
}
