//! End-to-end tests for the `carousel` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn carousel() -> Command {
    Command::cargo_bin("carousel").expect("binary exists")
}

#[test]
fn test_help_lists_commands() {
    carousel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("backends"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_flag() {
    carousel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("carousel"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("carousel.toml");

    carousel()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.contains("[selector]"));
    assert!(contents.contains("[store]"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("carousel.toml");
    std::fs::write(&output, "# existing\n").unwrap();

    carousel()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "# existing\n");
}

#[test]
fn test_status_json_on_fresh_store() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("state.json");

    carousel()
        .args(["status", "--json", "--store"])
        .arg(&store)
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"targets\": []"))
        .stdout(predicate::str::contains("\"isRotating\": false"));
}

#[test]
fn test_apply_then_status_shows_targets() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("state.json");
    let push = dir.path().join("push.json");
    std::fs::write(
        &push,
        r#"{
            "urls": ["https://grafana.example/d/ops", "https://grafana.example/d/sales"],
            "rotationInterval": 45.0,
            "enableDarkMode": true,
            "enableAIDetection": false,
            "alertThreshold": 5.0
        }"#,
    )
    .unwrap();

    carousel()
        .args(["apply", "--file"])
        .arg(&push)
        .args(["--store"])
        .arg(&store)
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 target(s)"));

    carousel()
        .args(["status", "--json", "--store"])
        .arg(&store)
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("https://grafana.example/d/ops"))
        .stdout(predicate::str::contains("\"rotationIntervalSeconds\": 45.0"));
}

#[test]
fn test_apply_rejects_malformed_push() {
    let dir = TempDir::new().unwrap();
    let push = dir.path().join("push.json");
    std::fs::write(&push, "{ not json").unwrap();

    carousel()
        .args(["apply", "--file"])
        .arg(&push)
        .args(["--store"])
        .arg(dir.path().join("state.json"))
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_apply_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    carousel()
        .args(["apply", "--file"])
        .arg(dir.path().join("nope.json"))
        .args(["--store"])
        .arg(dir.path().join("state.json"))
        .args(["--config"])
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure();
}

#[test]
fn test_completions_bash() {
    carousel()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("carousel"));
}
