//! Command line tests running the actual `assetgit` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn assetgit() -> Command {
    let mut cmd = Command::cargo_bin("assetgit").unwrap();
    cmd.env_remove("ASSETGIT_GIT");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_operations() {
    assetgit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("revert"))
        .stdout(predicate::str::contains("refresh"));
}

#[test]
fn test_version() {
    assetgit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("assetgit "));
}

#[test]
fn test_refresh_help_mentions_untracked_files() {
    assetgit()
        .args(["refresh", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--all"))
        .stdout(predicate::str::contains("untracked"));
}

#[test]
fn test_missing_git_executable_fails() {
    let temp_dir = TempDir::new().unwrap();
    assetgit()
        .current_dir(temp_dir.path())
        .args(["--no-color", "--git", "/nonexistent/bin/git", "status"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assetgit()
        .arg("checkout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
