//! CLI definitions using clap.

use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// mkgen - generate Makefiles for every directory holding a program
#[derive(Parser)]
#[command(name = "mkgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Number of parallel workers
    #[arg(short, long, env = "MKGEN_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Print the Makefiles instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop all workers as soon as one subtree fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format for progress and results
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

impl Cli {
    /// Whether diagnostics on stderr should be colored.
    pub fn color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable status lines
    Human,
    /// One JSON event per line on stdout
    Json,
}
