//! High-level operations.
//!
//! This module contains the implementation of mkgen commands.

pub mod bootstrap;
pub mod generate;

pub use bootstrap::prepare_tree;
pub use generate::{
    generate, GenerateError, GenerateOptions, GenerateReport, Outcome, SubtreeReport,
    SubtreeWorker, WrittenDescriptor,
};
