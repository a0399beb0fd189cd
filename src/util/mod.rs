//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod fs;

pub use config::{Config, ConfigError};
pub use diagnostic::Diagnostic;
