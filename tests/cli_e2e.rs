//! End-to-end CLI tests for the get-comics binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--save-links"))
        .stdout(predicate::str::contains("--cbz"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("get-comics"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that --url together with a listing filter is refused before any network use.
#[test]
fn test_binary_url_with_tag_is_refused() {
    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.args(["--url", "https://getcomics.org/dc/x/", "--tag", "dc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

/// Test that a malformed explicit URL fails the run with a suggestion.
#[test]
fn test_binary_malformed_url_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.env("XDG_CONFIG_HOME", dir.path())
        .args(["--quiet", "--url", "http://", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Suggestion"));
}

/// Test that an invalid config file is reported.
#[test]
fn test_binary_rejects_bad_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_dir = dir.path().join("get-comics");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "concurrency = 4\n").unwrap();

    let mut cmd = Command::cargo_bin("get-comics").unwrap();
    cmd.env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
