//! Makefile rendering and descriptor writers.
//!
//! Writers are shared by every subtree worker at once, so the trait requires
//! `Sync` and takes `&self`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::DirectoryDescriptor;
use crate::util::fs::write_if_changed;

/// Name of the generated build file.
pub const MAKEFILE_NAME: &str = "Makefile";

const HEADER: &str = "# Generated by mkgen. Do not edit.";

/// Rule names the Makefile defines itself; programs with these names are left out.
const RESERVED_TARGETS: &[&str] = &["all", "clean"];

/// Persists directory descriptors.
pub trait DescriptorWriter: Sync {
    /// Persist one descriptor. Returns where it went, if anywhere.
    fn write(&self, descriptor: &DirectoryDescriptor) -> io::Result<Option<PathBuf>>;
}

/// Render a descriptor as Makefile text.
pub fn render_makefile(desc: &DirectoryDescriptor) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&variable("CC", &[desc.compiler.clone()]));
    out.push_str(&variable("CFLAGS", &desc.flags));
    let libs: Vec<String> = desc.libraries.iter().map(|l| link_flag(l)).collect();
    out.push_str(&variable("LDLIBS", &libs));

    let targets: Vec<_> = desc
        .targets
        .iter()
        .filter(|t| {
            let reserved = RESERVED_TARGETS.contains(&t.name.as_str());
            if reserved {
                tracing::warn!(
                    "{}: skipping program `{}`, the name clashes with a phony rule",
                    desc.directory().display(),
                    t.name
                );
            }
            !reserved
        })
        .collect();
    let names = targets
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str("\n.PHONY: all clean\n\n");
    out.push_str(&format!("all: {}\n", names));

    for target in targets {
        out.push('\n');
        out.push_str(&format!(
            "{}: {}\n",
            target.name,
            target.sources(&desc.extension).join(" ")
        ));
        out.push_str("\t$(CC) $(CFLAGS) -o $@ $^ $(LDLIBS)\n");
    }

    out.push_str(&format!("\nclean:\n\trm -f {}\n", names));
    out
}

fn variable(name: &str, values: &[String]) -> String {
    if values.is_empty() {
        format!("{} =\n", name)
    } else {
        format!("{} = {}\n", name, values.join(" "))
    }
}

/// `m` becomes `-lm`; anything already starting with `-` is passed through.
fn link_flag(lib: &str) -> String {
    if lib.starts_with('-') {
        lib.to_string()
    } else {
        format!("-l{}", lib)
    }
}

/// Writes a `Makefile` into each descriptor's directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct MakefileWriter;

impl MakefileWriter {
    pub fn new() -> Self {
        MakefileWriter
    }

    /// Path the Makefile for `dir` is written to.
    pub fn makefile_path(dir: &Path) -> PathBuf {
        dir.join(MAKEFILE_NAME)
    }
}

impl DescriptorWriter for MakefileWriter {
    fn write(&self, descriptor: &DirectoryDescriptor) -> io::Result<Option<PathBuf>> {
        let path = Self::makefile_path(descriptor.directory());
        if write_if_changed(&path, &render_makefile(descriptor))? {
            tracing::info!("wrote {}", path.display());
        } else {
            tracing::debug!("{} is up to date", path.display());
        }
        Ok(Some(path))
    }
}

/// Collects descriptors in memory instead of persisting them.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    descriptors: Mutex<Vec<DirectoryDescriptor>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        MemoryWriter::default()
    }

    /// Everything written so far, sorted by directory.
    pub fn into_descriptors(self) -> Vec<DirectoryDescriptor> {
        let mut descriptors = self
            .descriptors
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        descriptors.sort_by(|a, b| a.directory.cmp(&b.directory));
        descriptors
    }
}

impl DescriptorWriter for MemoryWriter {
    fn write(&self, descriptor: &DirectoryDescriptor) -> io::Result<Option<PathBuf>> {
        self.descriptors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(descriptor.clone());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Target, Template};
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn descriptor(dir: &Path) -> DirectoryDescriptor {
        let deps: BTreeSet<String> = ["util.cpp", "helper.cpp"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        DirectoryDescriptor::new(
            dir,
            vec![Target::new("main", deps)],
            "cpp",
            &Template::new(
                "g++",
                vec!["-Wall".into(), "-g".into()],
                vec!["m".into(), "-pthread".into()],
            ),
        )
    }

    #[test]
    fn test_render_makefile() {
        let text = render_makefile(&descriptor(Path::new("ch01")));
        let expected = "\
# Generated by mkgen. Do not edit.
CC = g++
CFLAGS = -Wall -g
LDLIBS = -lm -pthread

.PHONY: all clean

all: main

main: main.cpp helper.cpp util.cpp
\t$(CC) $(CFLAGS) -o $@ $^ $(LDLIBS)

clean:
\trm -f main
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_empty_flags() {
        let desc = DirectoryDescriptor::new(
            "x",
            vec![Target::new("a", BTreeSet::new()), Target::new("b", BTreeSet::new())],
            "c",
            &Template::new("cc", vec![], vec![]),
        );
        let text = render_makefile(&desc);
        assert!(text.contains("CFLAGS =\n"));
        assert!(text.contains("LDLIBS =\n"));
        assert!(text.contains("all: a b\n"));
        assert!(text.contains("a: a.c\n"));
        assert!(text.contains("rm -f a b\n"));
    }

    #[test]
    fn test_render_skips_reserved_names() {
        let desc = DirectoryDescriptor::new(
            "x",
            vec![
                Target::new("all", BTreeSet::new()),
                Target::new("clean", BTreeSet::new()),
                Target::new("main", BTreeSet::new()),
            ],
            "cpp",
            &Template::new("g++", vec![], vec![]),
        );
        let text = render_makefile(&desc);
        assert!(text.contains("all: main\n"));
        assert!(text.contains("rm -f main\n"));
        assert!(!text.contains("all: all.cpp"));
        assert!(!text.contains("clean: clean.cpp"));
        assert_eq!(text.matches("\nclean:").count(), 1);
    }

    #[test]
    fn test_makefile_writer() {
        let tmp = TempDir::new().unwrap();
        let desc = descriptor(tmp.path());

        let path = MakefileWriter::new().write(&desc).unwrap().unwrap();
        assert_eq!(path, tmp.path().join("Makefile"));
        assert_eq!(fs::read_to_string(&path).unwrap(), render_makefile(&desc));
    }

    #[test]
    fn test_memory_writer_sorts() {
        let writer = MemoryWriter::new();
        writer.write(&descriptor(Path::new("b"))).unwrap();
        writer.write(&descriptor(Path::new("a"))).unwrap();

        let dirs: Vec<_> = writer
            .into_descriptors()
            .into_iter()
            .map(|d| d.directory)
            .collect();
        assert_eq!(dirs, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}
