#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trending"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("explore"))
        .stdout(predicate::str::contains("browse"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_blank_query() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.args(["search", "--query", "   ", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query must not be blank"));
}

#[test]
fn test_trending_without_token_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["trending", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[test]
fn test_explore_rejects_unknown_kind() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.args(["explore", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown media kind"));
}

#[test]
fn test_explore_rejects_people() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.args(["explore", "person", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"movie\" and \"tv\" only"));
}

#[test]
fn test_invalid_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[catalog\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movieo");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .args(["details", "--id", "414906", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}
