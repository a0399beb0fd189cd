//! Core data types.

pub mod source;
pub mod target;
pub mod template;

pub use target::{DirectoryDescriptor, Target};
pub use template::Template;
