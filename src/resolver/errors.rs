//! Resolution error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while scanning or classifying source files.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` includes `{name}`, which does not exist", included_from.display())]
    MissingInclude {
        name: String,
        included_from: PathBuf,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ResolveError::Read {
            path: path.into(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Read { path, source } => {
                Diagnostic::error(format!("failed to read `{}`", path.display()))
                    .with_context(source.to_string())
                    .with_suggestion("Check that the file exists and is readable".to_string())
            }

            ResolveError::MissingInclude {
                name,
                included_from,
                path,
                ..
            } => Diagnostic::error(format!("included file `{}` not found", name))
                .with_location(included_from.clone())
                .with_context(format!("expected at {}", path.display()))
                .with_suggestion(format!(
                    "Add `{}` next to `{}` or remove the include",
                    name,
                    included_from.display()
                )),
        }
    }
}
