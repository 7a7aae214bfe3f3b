//! Binary-level checks: argument surface and config failure paths. The
//! interactive UI itself needs a tty, so these stop at the boundary.

use std::fs;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

fn cardfile_cmd() -> AssertCommand {
    AssertCommand::cargo_bin("cardfile").unwrap()
}

#[test]
fn help_describes_the_app() {
    cardfile_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive terminal contact book"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn version_prints_name_and_version() {
    cardfile_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cardfile"));
}

#[test]
fn malformed_config_fails_before_entering_the_ui() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[template\nname = ").unwrap();

    cardfile_cmd()
        .args(["--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn missing_explicit_config_fails_with_a_clear_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    cardfile_cmd()
        .args(["--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read configuration file"));
}
