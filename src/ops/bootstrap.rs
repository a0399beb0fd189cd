//! Project tree bootstrapping.
//!
//! The root and every configured subtree are created before generation so a
//! fresh checkout can be pointed at an empty location.

use std::path::PathBuf;

use anyhow::Result;

use crate::util::fs::ensure_dir;
use crate::util::Config;

/// Create the configured root and subtrees if they are missing.
///
/// Returns the directories that had to be created.
pub fn prepare_tree(config: &Config) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    let root = config.root().to_path_buf();
    if !root.is_dir() {
        ensure_dir(&root)?;
        tracing::info!("created {}", root.display());
        created.push(root);
    }

    for sub in config.subtree_roots() {
        if !sub.is_dir() {
            ensure_dir(&sub)?;
            tracing::info!("created {}", sub.display());
            created.push(sub);
        }
    }

    Ok(created)
}
