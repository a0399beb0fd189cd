//! `mkgen <CONFIG>` command

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use crate::cli::{Cli, MessageFormat};
use mkgen::builder::makefile::render_makefile;
use mkgen::builder::{GenerateEvent, MakefileWriter, MemoryWriter};
use mkgen::ops::{generate, prepare_tree, GenerateOptions, GenerateReport, Outcome};
use mkgen::util::diagnostic::{emit, Diagnostic};
use mkgen::util::Config;

pub fn execute(args: &Cli) -> Result<()> {
    let start = Instant::now();
    let config = Config::load(&args.config)?;

    if config.directory_structure.subs.is_empty() {
        let diag = Diagnostic::warning("no subdirectories configured; nothing to generate")
            .with_location(args.config.clone())
            .with_suggestion("List directories under `directory_structure.subs`");
        emit(&diag, args.color());
    }

    let mut opts = GenerateOptions::from_config(&config);
    if let Some(jobs) = args.jobs {
        opts.jobs = Some(jobs.get());
    }
    opts.fail_fast = args.fail_fast;

    let template = config.template();

    let report = if args.dry_run {
        opts.subtrees = existing_subtrees(opts.subtrees, args.color());
        let writer = MemoryWriter::new();
        let report = generate(&opts, &template, &writer)?;
        if args.message_format == MessageFormat::Human {
            for desc in writer.into_descriptors() {
                println!(
                    "# {}\n{}",
                    MakefileWriter::makefile_path(desc.directory()).display(),
                    render_makefile(&desc)
                );
            }
        }
        report
    } else {
        prepare_tree(&config)?;
        generate(&opts, &template, &MakefileWriter::new())?
    };

    let elapsed = start.elapsed();
    match args.message_format {
        MessageFormat::Human => {
            eprintln!(
                "    Finished {} Makefile(s) in {:.2}s",
                report.descriptor_count(),
                elapsed.as_secs_f64()
            );
        }
        MessageFormat::Json => emit_events(&report, elapsed.as_millis() as u64),
    }

    report.into_result()?;
    Ok(())
}

/// Dry runs never create directories, so missing subtrees are skipped.
fn existing_subtrees(subtrees: Vec<PathBuf>, color: bool) -> Vec<PathBuf> {
    subtrees
        .into_iter()
        .filter(|sub| {
            let exists = sub.is_dir();
            if !exists {
                let diag = Diagnostic::warning("skipping missing subtree")
                    .with_location(sub.clone())
                    .with_context("dry runs do not create directories");
                emit(&diag, color);
            }
            exists
        })
        .collect()
}

fn emit_events(report: &GenerateReport, duration_ms: u64) {
    for written in report.written() {
        let event = GenerateEvent::written(
            written.directory.clone(),
            written.build_file.clone(),
            written.targets.clone(),
        );
        println!("{}", event.to_json());
    }

    for subtree in &report.subtrees {
        let event = match &subtree.outcome {
            Outcome::Completed => continue,
            Outcome::Failed(err) => GenerateEvent::failed(subtree.root.clone(), err.full_message()),
            Outcome::Cancelled => GenerateEvent::SubtreeCancelled {
                subtree: subtree.root.clone(),
            },
        };
        println!("{}", event.to_json());
    }

    let finished = GenerateEvent::finished(
        report.is_success(),
        duration_ms,
        report.descriptor_count() as u64,
    );
    println!("{}", finished.to_json());
}
