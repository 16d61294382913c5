//! End-to-end tests for the `tomato` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tomato(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tomato").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("TOMATO_CONFIG")
        .env_remove("TOMATO_REST_URL")
        .env_remove("TOMATO_API_KEY")
        .env_remove("TOMATO_ACCESS_TOKEN")
        .env_remove("TOMATO_USER_ID")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    tomato(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pomodoro"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("today"));
}

#[test]
fn test_today_json_on_empty_home() {
    let home = TempDir::new().unwrap();
    tomato(&home)
        .args(["today", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed_work_sessions\": 0"))
        .stdout(predicate::str::contains("\"cycles\": 0"));

    assert!(home.path().join(".tomato").join("tomato.db").exists());
}

#[test]
fn test_history_pretty_empty() {
    let home = TempDir::new().unwrap();
    tomato(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No focus sessions found"));
}

#[test]
fn test_start_rejects_zero_minutes() {
    let home = TempDir::new().unwrap();
    tomato(&home)
        .args(["start", "--minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0"));
}

#[test]
fn test_config_init_then_path() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.yaml");

    tomato(&home)
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));
    assert!(config.exists());

    tomato(&home)
        .env("TOMATO_CONFIG", &config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.yaml"));
}

#[test]
fn test_disabled_backend_reports_zero() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.yaml");
    std::fs::write(&config, "storage:\n  backend: none\n").unwrap();

    tomato(&home)
        .args(["today", "-o", "json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed_work_sessions\": 0"));

    assert!(!home.path().join(".tomato").join("tomato.db").exists());
}

#[test]
fn test_invalid_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.yaml");
    std::fs::write(&config, "focus:\n  work_minutes: 0\n").unwrap();

    tomato(&home)
        .args(["today", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    tomato(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tomato"));
}
