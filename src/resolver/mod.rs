//! Include closure resolution.
//!
//! Starting from an entry point, quoted includes are followed through sibling
//! files until no new file turns up. The walk keeps an explicit frontier and
//! visited set, so include depth never grows the call stack.
//!
//! The root file is marked visited before the walk starts but is not part of
//! its own closure. If a cycle leads back to it, the name that reaches it is
//! recorded like any other include and the root appears in the result.

pub mod entry;
pub mod errors;
pub mod scan;

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::Path;

pub use entry::{is_entry_point, DEFAULT_ENTRY_MARKER};
pub use errors::ResolveError;
pub use scan::scan;

/// An include waiting to be scanned, with the file that named it.
struct Pending {
    name: String,
    included_from: String,
}

/// Resolve the set of files reachable from `root` through quoted includes.
///
/// Returned names carry the root's extension. Every included file must exist
/// next to `root`; a missing one fails the whole resolution.
pub fn resolve(root: &Path) -> Result<BTreeSet<String>, ResolveError> {
    let dir = root.parent().unwrap_or_else(|| Path::new(""));
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(root_name.clone());

    let mut frontier: Vec<Pending> = scan(root)?
        .into_iter()
        .map(|name| Pending {
            name,
            included_from: root_name.clone(),
        })
        .collect();
    let mut closure: BTreeSet<String> = frontier.iter().map(|p| p.name.clone()).collect();

    while let Some(Pending {
        name,
        included_from,
    }) = frontier.pop()
    {
        if !visited.insert(name.clone()) {
            continue;
        }

        let path = dir.join(&name);
        let children = match scan(&path) {
            Ok(children) => children,
            Err(ResolveError::Read { path, source }) if source.kind() == io::ErrorKind::NotFound => {
                return Err(ResolveError::MissingInclude {
                    name,
                    included_from: dir.join(included_from),
                    path,
                    source,
                });
            }
            Err(e) => return Err(e),
        };

        for child in children {
            closure.insert(child.clone());
            frontier.push(Pending {
                name: child,
                included_from: name.clone(),
            });
        }
    }

    tracing::debug!(
        "{}: closure of {} file(s) after visiting {}",
        root.display(),
        closure.len(),
        visited.len()
    );
    Ok(closure)
}
