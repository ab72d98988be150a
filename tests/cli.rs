//! Command line smoke tests
//!
//! Nothing here needs a running points server.

use assert_cmd::Command;
use predicates::prelude::*;

fn pointree(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("pointree").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("POINTREE_CONFIG")
        .env_remove("POINTREE_SERVER_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    pointree(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("expand"));
}

#[test]
fn test_expand_without_title_fails_locally() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on port 9; only a local failure can come back
    pointree(dir.path())
        .args(["--server-url", "http://127.0.0.1:9", "expand", "--title", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a title first"));
}

#[test]
fn test_init_then_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    pointree(dir.path())
        .args(["--server-url", "http://kb.local:5000", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized pointree"));
    assert!(dir.path().join(".pointree/config.toml").exists());

    pointree(dir.path())
        .args(["config", "server.url"])
        .assert()
        .success()
        .stdout("http://kb.local:5000\n");

    pointree(dir.path())
        .args(["config", "graph.min_size", "10"])
        .assert()
        .success();
    pointree(dir.path())
        .args(["config", "graph.min_size"])
        .assert()
        .success()
        .stdout("10\n");

    pointree(dir.path())
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_unreachable_server_reports_context() {
    let dir = tempfile::tempdir().unwrap();
    pointree(dir.path())
        .args(["--server-url", "http://127.0.0.1:9", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load knowledge"))
        .stderr(predicate::str::contains("Cannot reach points server"));
}

#[test]
fn test_generate_needs_title_or_id() {
    let dir = tempfile::tempdir().unwrap();
    pointree(dir.path())
        .args(["generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}
