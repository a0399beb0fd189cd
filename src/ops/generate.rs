//! Implementation of Makefile generation over a project tree.
//!
//! Each configured subtree is walked by its own worker on a rayon pool. A
//! worker owns its walker and resolver state; the only things shared between
//! workers are the read-only template, the writer and a cancellation flag.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::builder::{DescriptorBuilder, DescriptorWriter};
use crate::core::{Target, Template};
use crate::resolver::{ResolveError, DEFAULT_ENTRY_MARKER};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::Config;

/// Error produced while generating one subtree.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to resolve targets in `{}`", directory.display())]
    Resolve {
        directory: PathBuf,
        #[source]
        source: ResolveError,
    },

    #[error("failed to walk `{}`", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write build file for `{}`", directory.display())]
    Write {
        directory: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("{} subtree(s) failed", failures.len())]
    SubtreesFailed {
        failures: Vec<(PathBuf, GenerateError)>,
        cancelled: usize,
    },
}

impl GenerateError {
    /// The error message followed by every underlying cause.
    pub fn full_message(&self) -> String {
        chain(self)
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateError::Resolve { directory, source } => {
                let mut diag = source.to_diagnostic();
                diag.message = format!("{} ({})", diag.message, directory.display());
                diag
            }
            GenerateError::SubtreesFailed {
                failures,
                cancelled,
            } => {
                let mut diag = Diagnostic::error(self.to_string());
                for (root, err) in failures {
                    diag = diag.with_context(format!("{}: {}", root.display(), chain(err)));
                }
                if *cancelled > 0 {
                    diag = diag.with_context(format!("{} subtree(s) cancelled", cancelled));
                }
                diag.with_suggestion(suggestions::GENERATE_FAILED)
            }
            other => Diagnostic::error(chain(other)),
        }
    }
}

/// Render an error followed by its causes, `a: b: c`.
fn chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Subtree roots, one worker each
    pub subtrees: Vec<PathBuf>,

    /// Directory names never descended into
    pub ignored: BTreeSet<String>,

    /// Source extension (leading dot optional)
    pub extension: String,

    /// Program-start marker
    pub entry_marker: String,

    /// Worker pool size (None = available parallelism)
    pub jobs: Option<usize>,

    /// Stop every worker as soon as one fails
    pub fail_fast: bool,
}

impl GenerateOptions {
    /// Options for the given subtrees with defaults for everything else.
    pub fn new(subtrees: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        GenerateOptions {
            subtrees,
            ignored: BTreeSet::new(),
            extension: extension.into(),
            entry_marker: DEFAULT_ENTRY_MARKER.to_string(),
            jobs: None,
            fail_fast: false,
        }
    }

    /// Options described by a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        GenerateOptions {
            subtrees: config.subtree_roots(),
            ignored: config.ignored_dirs(),
            extension: config.extension().to_string(),
            entry_marker: config.entry_marker.clone(),
            jobs: config.build.jobs,
            fail_fast: false,
        }
    }
}

/// A descriptor handed to the writer.
#[derive(Debug, Clone)]
pub struct WrittenDescriptor {
    /// Directory described
    pub directory: PathBuf,
    /// Where the writer put it, if anywhere
    pub build_file: Option<PathBuf>,
    /// Targets it contained
    pub targets: Vec<Target>,
}

/// How a subtree worker finished.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    Failed(GenerateError),
    Cancelled,
}

/// Result of one subtree worker.
#[derive(Debug)]
pub struct SubtreeReport {
    /// Subtree root
    pub root: PathBuf,
    /// Directories visited, pruned ones excluded
    pub directories_visited: usize,
    /// Descriptors written, in walk order
    pub written: Vec<WrittenDescriptor>,
    /// How the worker finished
    pub outcome: Outcome,
}

impl SubtreeReport {
    fn new(root: &Path) -> Self {
        SubtreeReport {
            root: root.to_path_buf(),
            directories_visited: 0,
            written: Vec::new(),
            outcome: Outcome::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed)
    }
}

/// Result of a whole run, one report per subtree in configured order.
#[derive(Debug)]
pub struct GenerateReport {
    pub subtrees: Vec<SubtreeReport>,
}

impl GenerateReport {
    /// Every descriptor written, across all subtrees.
    pub fn written(&self) -> impl Iterator<Item = &WrittenDescriptor> {
        self.subtrees.iter().flat_map(|s| s.written.iter())
    }

    /// Number of descriptors written.
    pub fn descriptor_count(&self) -> usize {
        self.subtrees.iter().map(|s| s.written.len()).sum()
    }

    /// Whether every subtree completed.
    pub fn is_success(&self) -> bool {
        self.subtrees.iter().all(SubtreeReport::is_completed)
    }

    /// Turn failed subtrees into one aggregate error.
    pub fn into_result(self) -> Result<Self, GenerateError> {
        if self.is_success() {
            return Ok(self);
        }
        let mut failures = Vec::new();
        let mut cancelled = 0;
        for subtree in self.subtrees {
            match subtree.outcome {
                Outcome::Completed => {}
                Outcome::Failed(err) => failures.push((subtree.root, err)),
                Outcome::Cancelled => cancelled += 1,
            }
        }
        Err(GenerateError::SubtreesFailed {
            failures,
            cancelled,
        })
    }
}

/// Walks one subtree and writes a descriptor for every directory with
/// entry points.
pub struct SubtreeWorker<'a> {
    root: &'a Path,
    ignored: &'a BTreeSet<String>,
    builder: DescriptorBuilder<'a>,
    writer: &'a dyn DescriptorWriter,
    cancel: &'a AtomicBool,
    fail_fast: bool,
}

impl<'a> SubtreeWorker<'a> {
    pub fn new(
        root: &'a Path,
        ignored: &'a BTreeSet<String>,
        builder: DescriptorBuilder<'a>,
        writer: &'a dyn DescriptorWriter,
        cancel: &'a AtomicBool,
    ) -> Self {
        SubtreeWorker {
            root,
            ignored,
            builder,
            writer,
            cancel,
            fail_fast: false,
        }
    }

    /// Raise the cancellation flag when this worker fails.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Walk the subtree in pre-order, pruning ignored directories.
    pub fn run(&self) -> SubtreeReport {
        let mut report = SubtreeReport::new(self.root);
        tracing::debug!("walking {}", self.root.display());

        let walker = WalkDir::new(self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored(entry));

        for entry in walker {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::debug!("{}: cancelled", self.root.display());
                report.outcome = Outcome::Cancelled;
                return report;
            }

            let result = match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    report.directories_visited += 1;
                    self.visit(entry.path())
                }
                Ok(_) => continue,
                Err(source) => Err(GenerateError::Walk {
                    path: source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.to_path_buf()),
                    source,
                }),
            };

            match result {
                Ok(Some(written)) => report.written.push(written),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!("{}: {}", self.root.display(), err);
                    if self.fail_fast {
                        self.cancel.store(true, Ordering::Relaxed);
                    }
                    report.outcome = Outcome::Failed(err);
                    return report;
                }
            }
        }

        report
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.ignored.contains(name))
    }

    fn visit(&self, dir: &Path) -> Result<Option<WrittenDescriptor>, GenerateError> {
        let descriptor = match self.builder.build(dir) {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => return Ok(None),
            Err(source) => {
                return Err(GenerateError::Resolve {
                    directory: dir.to_path_buf(),
                    source,
                })
            }
        };

        let build_file = self
            .writer
            .write(&descriptor)
            .map_err(|source| GenerateError::Write {
                directory: dir.to_path_buf(),
                source,
            })?;

        Ok(Some(WrittenDescriptor {
            directory: descriptor.directory,
            build_file,
            targets: descriptor.targets,
        }))
    }
}

/// Generate descriptors for every configured subtree.
///
/// Workers run concurrently and never wait on each other. The call returns
/// once all of them have finished; failed subtrees are recorded in the
/// report rather than returned as an error.
pub fn generate(
    opts: &GenerateOptions,
    template: &Template,
    writer: &dyn DescriptorWriter,
) -> Result<GenerateReport, GenerateError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs.unwrap_or(0))
        .thread_name(|i| format!("mkgen-worker-{}", i))
        .build()?;

    let cancel = AtomicBool::new(false);
    let builder =
        DescriptorBuilder::new(template, &opts.extension).entry_marker(&opts.entry_marker);

    tracing::debug!(
        "generating {} subtree(s) on {} thread(s)",
        opts.subtrees.len(),
        pool.current_num_threads()
    );

    let subtrees = pool.install(|| {
        opts.subtrees
            .par_iter()
            .map(|root| {
                SubtreeWorker::new(root, &opts.ignored, builder, writer, &cancel)
                    .fail_fast(opts.fail_fast)
                    .run()
            })
            .collect::<Vec<_>>()
    });

    Ok(GenerateReport { subtrees })
}
