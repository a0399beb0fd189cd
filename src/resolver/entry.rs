//! Entry-point classification.
//!
//! A file is an entry point when its text contains the program-start marker
//! anywhere, comments and string literals included.

use std::fs;
use std::path::Path;

use crate::resolver::errors::ResolveError;

/// Marker used when configuration does not name one.
pub const DEFAULT_ENTRY_MARKER: &str = "int main(";

/// Whether `file` contains `marker`.
pub fn is_entry_point(file: &Path, marker: &str) -> Result<bool, ResolveError> {
    let bytes = fs::read(file).map_err(|e| ResolveError::read(file, e))?;
    Ok(String::from_utf8_lossy(&bytes).contains(marker))
}
