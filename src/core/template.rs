//! Build settings shared by every directory in a run.

use serde::Serialize;

/// Compiler, flags and libraries copied into every descriptor.
///
/// Built once from configuration and only ever handed out by shared
/// reference, so workers can read it concurrently without locking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Compiler executable (e.g. `g++`)
    pub compiler: String,

    /// Flags passed on every compile
    pub flags: Vec<String>,

    /// Libraries linked into every target
    pub libraries: Vec<String>,
}

impl Template {
    pub fn new(compiler: impl Into<String>, flags: Vec<String>, libraries: Vec<String>) -> Self {
        Template {
            compiler: compiler.into(),
            flags,
            libraries,
        }
    }
}
