//! CLI integration tests for mkgen.
//!
//! These tests run the binary against throwaway source trees and inspect the
//! Makefiles it leaves behind.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the mkgen binary command.
fn mkgen() -> Command {
    let mut cmd = Command::cargo_bin("mkgen").unwrap();
    cmd.env_remove("MKGEN_JOBS").env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_config(root: &Path, subs: &[&str]) -> std::path::PathBuf {
    let subs: Vec<String> = subs.iter().map(|s| format!("\"{}\"", s)).collect();
    let config = format!(
        r#"source_extension = ".cpp"

[directory_structure]
root = "projects"
subs = [{}]
ignored = ["build"]

[makefile_options]
compiler = "g++"
compiler_flags = ["-Wall", "-std=c++17"]
libraries = ["m"]
"#,
        subs.join(", ")
    );
    let path = root.join("mkgen.toml");
    fs::write(&path, config).unwrap();
    path
}

/// ch01 holds a program with a transitive include chain plus a library file,
/// ch02 holds two programs including each other.
fn sample_project(root: &Path) {
    write(root, "projects/ch01/main.cpp", "#include \"util.h\"\nint main() { return util(); }\n");
    write(root, "projects/ch01/util.cpp", "#include \"helper.h\"\nint util() { return helper(); }\n");
    write(root, "projects/ch01/helper.cpp", "int helper() { return 0; }\n");
    write(root, "projects/ch01/lib.cpp", "int lib() { return 1; }\n");
    write(root, "projects/ch01/build/old.cpp", "int main() {}\n");
    write(root, "projects/ch02/a.cpp", "#include \"b.h\"\nint main() {}\n");
    write(root, "projects/ch02/b.cpp", "#include \"a.h\"\nint main() {}\n");
}

// ============================================================================
// argument handling
// ============================================================================

#[test]
fn test_missing_config_argument_exits_2() {
    mkgen()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_config_file_fails() {
    let tmp = temp_dir();

    mkgen()
        .arg(tmp.path().join("absent.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_incomplete_config_fails_before_traversal() {
    let tmp = temp_dir();
    let config = tmp.path().join("mkgen.toml");
    fs::write(
        &config,
        "source_extension = \".cpp\"\n\n[directory_structure]\nroot = \"projects\"\nsubs = [\"ch01\"]\nignored = []\n",
    )
    .unwrap();

    mkgen()
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing field `makefile_options`"));

    assert!(!tmp.path().join("projects").exists());
}

// ============================================================================
// generation
// ============================================================================

#[test]
fn test_generates_makefiles() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    let config = write_config(tmp.path(), &["ch01", "ch02"]);

    mkgen()
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished 2 Makefile(s)"));

    let ch01 = fs::read_to_string(tmp.path().join("projects/ch01/Makefile")).unwrap();
    assert!(ch01.contains("CC = g++"));
    assert!(ch01.contains("CFLAGS = -Wall -std=c++17"));
    assert!(ch01.contains("LDLIBS = -lm"));
    assert!(ch01.contains("main: main.cpp helper.cpp util.cpp\n"));
    assert!(!ch01.contains("lib.cpp"));

    let ch02 = fs::read_to_string(tmp.path().join("projects/ch02/Makefile")).unwrap();
    assert!(ch02.contains("all: a b\n"));
    assert!(ch02.contains("a: a.cpp b.cpp\n"));
    assert!(ch02.contains("b: b.cpp a.cpp\n"));

    assert!(!tmp.path().join("projects/ch01/build/Makefile").exists());
}

#[test]
fn test_creates_missing_subtrees() {
    let tmp = temp_dir();
    let config = write_config(tmp.path(), &["ch01", "ch09"]);

    mkgen().arg(&config).assert().success();

    assert!(tmp.path().join("projects/ch01").is_dir());
    assert!(tmp.path().join("projects/ch09").is_dir());
}

#[test]
fn test_dry_run_prints_without_writing() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    let config = write_config(tmp.path(), &["ch01", "ch02"]);

    mkgen()
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("main: main.cpp helper.cpp util.cpp"))
        .stdout(predicate::str::contains("# Generated by mkgen"));

    assert!(!tmp.path().join("projects/ch01/Makefile").exists());
}

#[test]
fn test_dry_run_warns_about_missing_subtree() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    let config = write_config(tmp.path(), &["ch01", "ch09"]);

    mkgen()
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipping missing subtree"))
        .stderr(predicate::str::contains("ch09"));

    assert!(!tmp.path().join("projects/ch09").exists());
}

#[test]
fn test_empty_subs_warns() {
    let tmp = temp_dir();
    let config = write_config(tmp.path(), &[]);

    mkgen()
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no subdirectories configured"))
        .stderr(predicate::str::contains("Finished 0 Makefile(s)"));
}

#[test]
fn test_json_events() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    let config = write_config(tmp.path(), &["ch01"]);

    mkgen()
        .arg(&config)
        .args(["--message-format", "json", "--jobs", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\":\"descriptor-written\""))
        .stdout(predicate::str::contains("\"dependencies\":[\"helper.cpp\",\"util.cpp\"]"))
        .stdout(predicate::str::contains("\"reason\":\"generate-finished\""));
}

#[test]
fn test_missing_include_reports_failure() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    write(tmp.path(), "projects/ch02/broken/main.cpp", "#include \"nowhere.h\"\nint main() {}\n");
    let config = write_config(tmp.path(), &["ch01", "ch02"]);

    mkgen()
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("1 subtree(s) failed"))
        .stderr(predicate::str::contains("nowhere.cpp"));

    // The healthy subtree is still generated.
    assert!(tmp.path().join("projects/ch01/Makefile").exists());
}

#[test]
fn test_jobs_from_environment() {
    let tmp = temp_dir();
    sample_project(tmp.path());
    let config = write_config(tmp.path(), &["ch01", "ch02"]);

    mkgen()
        .arg(&config)
        .env("MKGEN_JOBS", "1")
        .assert()
        .success();

    assert!(tmp.path().join("projects/ch02/Makefile").exists());
}

#[test]
fn test_zero_jobs_rejected() {
    let tmp = temp_dir();
    let config = write_config(tmp.path(), &["ch01"]);

    mkgen().arg(&config).args(["--jobs", "0"]).assert().code(2);
}
