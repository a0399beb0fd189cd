//! mkgen CLI - Makefile generation for source trees

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mkgen::ops::GenerateError;
use mkgen::util::diagnostic::{emit, Diagnostic};
use mkgen::util::ConfigError;

mod cli;
mod commands;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let color = cli.color();

    if let Err(e) = run(cli) {
        emit(&to_diagnostic(&e), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("mkgen=debug")
        } else {
            EnvFilter::new("mkgen=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    commands::generate::execute(&cli)
}

fn to_diagnostic(err: &anyhow::Error) -> Diagnostic {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        e.to_diagnostic()
    } else if let Some(e) = err.downcast_ref::<GenerateError>() {
        e.to_diagnostic()
    } else {
        Diagnostic::error(format!("{:#}", err))
    }
}
