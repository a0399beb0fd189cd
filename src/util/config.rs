//! Configuration file support for mkgen.
//!
//! A run is described by one TOML document:
//!
//! ```toml
//! source_extension = ".cpp"
//!
//! [directory_structure]
//! root = "projects"
//! subs = ["ch01", "ch02"]
//! ignored = [".git", "build"]
//!
//! [makefile_options]
//! compiler = "g++"
//! compiler_flags = ["-Wall", "-std=c++17"]
//! libraries = ["m"]
//! ```
//!
//! Required fields that are missing or have the wrong type fail the load
//! before any directory is visited. A relative `root` is resolved against the
//! directory holding the configuration file.

use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::source::normalize_extension;
use crate::core::Template;
use crate::resolver::DEFAULT_ENTRY_MARKER;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        let diag = match self {
            ConfigError::Read { path, source } => {
                diag.with_location(path.clone()).with_context(source.to_string())
            }
            ConfigError::Parse { path, source } => diag
                .with_location(path.clone())
                .with_context(source.message().to_string()),
            ConfigError::Invalid { .. } => diag,
        };
        diag.with_suggestion(suggestions::BAD_CONFIG)
    }
}

/// mkgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source file extension, with or without the leading dot
    pub source_extension: String,

    /// Text whose presence marks a file as a program entry point
    #[serde(default = "default_entry_marker")]
    pub entry_marker: String,

    /// Where to look for sources
    pub directory_structure: DirectoryStructure,

    /// Settings copied into every generated Makefile
    pub makefile_options: MakefileOptions,

    /// Run settings
    #[serde(default)]
    pub build: BuildConfig,
}

/// Directory layout of the project tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryStructure {
    /// Root of the tree
    pub root: PathBuf,

    /// Top-level subdirectories, one worker each
    pub subs: Vec<String>,

    /// Directory names never descended into
    pub ignored: Vec<String>,
}

/// Compiler settings shared by every Makefile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakefileOptions {
    /// Compiler executable
    pub compiler: String,

    /// Compiler flags
    pub compiler_flags: Vec<String>,

    /// Libraries to link
    pub libraries: Vec<String>,
}

/// Run-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Worker pool size (None = available parallelism)
    pub jobs: Option<usize>,
}

fn default_entry_marker() -> String {
    DEFAULT_ENTRY_MARKER.to_string()
}

impl Config {
    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.directory_structure.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.directory_structure.root = base.join(&config.directory_structure.root);
        }

        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_extension(&self.source_extension).is_empty() {
            return Err(ConfigError::invalid(
                "source_extension",
                "must name an extension such as \".cpp\"",
            ));
        }
        if self.entry_marker.is_empty() {
            return Err(ConfigError::invalid("entry_marker", "must not be empty"));
        }
        if self.makefile_options.compiler.trim().is_empty() {
            return Err(ConfigError::invalid(
                "makefile_options.compiler",
                "must not be empty",
            ));
        }
        if self.build.jobs == Some(0) {
            return Err(ConfigError::invalid("build.jobs", "must be at least 1"));
        }
        for sub in &self.directory_structure.subs {
            if !is_plain_relative(sub) {
                return Err(ConfigError::invalid(
                    "directory_structure.subs",
                    format!("`{}` must be a relative path inside the root", sub),
                ));
            }
        }
        Ok(())
    }

    /// Source extension without its leading dot.
    pub fn extension(&self) -> &str {
        normalize_extension(&self.source_extension)
    }

    /// Root of the project tree.
    pub fn root(&self) -> &Path {
        &self.directory_structure.root
    }

    /// Absolute-or-root-relative path of every configured subtree.
    pub fn subtree_roots(&self) -> Vec<PathBuf> {
        self.directory_structure
            .subs
            .iter()
            .map(|sub| self.directory_structure.root.join(sub))
            .collect()
    }

    /// Names of directories to prune during the walk.
    pub fn ignored_dirs(&self) -> BTreeSet<String> {
        self.directory_structure.ignored.iter().cloned().collect()
    }

    /// The immutable build template shared by all workers.
    pub fn template(&self) -> Template {
        Template::new(
            self.makefile_options.compiler.clone(),
            self.makefile_options.compiler_flags.clone(),
            self.makefile_options.libraries.clone(),
        )
    }
}

fn is_plain_relative(sub: &str) -> bool {
    let path = Path::new(sub);
    !sub.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
