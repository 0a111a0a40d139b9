// tests/test_cli.rs
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn given_help_flag_when_running_then_usage_shown() {
    let mut cmd = Command::cargo_bin("ragmark").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookmarks"))
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("search"));
}

#[test]
fn given_version_flag_when_running_then_version_shown() {
    let mut cmd = Command::cargo_bin("ragmark").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ragmark"));
}

#[test]
fn given_no_subcommand_when_running_then_usage_error() {
    let mut cmd = Command::cargo_bin("ragmark").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
