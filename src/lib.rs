//! mkgen - Makefile generation for trees of small C and C++ programs
//!
//! Every directory holding an entry-point source file gets a build
//! descriptor listing, for each entry point, the sibling sources reached
//! through its quoted includes. Subtrees are processed in parallel by
//! independent workers.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for mkgen unit tests.
///
/// This module is only available when compiling with `--cfg test`.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{DirectoryDescriptor, Target, Template};
pub use ops::{generate, GenerateOptions, GenerateReport};
pub use resolver::{is_entry_point, resolve, scan};
pub use util::Config;
