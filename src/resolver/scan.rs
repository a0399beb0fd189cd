//! Quoted-include scanning.
//!
//! A line counts as an include when it starts with `#include` and contains a
//! double quote. The name between the first pair of quotes is rewritten to
//! the scanned file's own extension, so `#include "util.h"` in `main.cpp`
//! yields `util.cpp`. Angle-bracket includes are skipped only because they
//! carry no quote; nothing else about the line is inspected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::source::source_name;
use crate::resolver::errors::ResolveError;

const INCLUDE_DIRECTIVE: &str = "#include";

/// Return the quoted includes of `file`, in file order.
pub fn scan(file: &Path) -> Result<Vec<String>, ResolveError> {
    let handle = File::open(file).map_err(|e| ResolveError::read(file, e))?;
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut includes = Vec::new();
    for line in BufReader::new(handle).split(b'\n') {
        let line = line.map_err(|e| ResolveError::read(file, e))?;
        let line = String::from_utf8_lossy(&line);
        if let Some(name) = quoted_include(&line) {
            includes.push(with_extension(name, &ext));
        }
    }

    tracing::debug!("{}: {} quoted include(s)", file.display(), includes.len());
    Ok(includes)
}

/// Extract the quoted name from one line, if it is an include line.
pub fn quoted_include(line: &str) -> Option<&str> {
    if !line.starts_with(INCLUDE_DIRECTIVE) || !line.contains('"') {
        return None;
    }
    line.split('"').nth(1)
}

/// Swap the extension of `name` for `ext`; `""` becomes `.ext`.
fn with_extension(name: &str, ext: &str) -> String {
    let stem = match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(old) => &name[..name.len() - old.len() - 1],
        None => name,
    };
    source_name(stem, ext)
}
