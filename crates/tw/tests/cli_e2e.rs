#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `tw` with an isolated config file and no platform environment.
fn tw_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("tw"));
    cmd.env("TW_CONFIG", temp.path().join("config.toml"))
        .env_remove("TW_LOG")
        .env_remove("TOWER_API_ENDPOINT")
        .env_remove("TOWER_ACCESS_TOKEN")
        .env_remove("TOWER_WORKSPACE_ID")
        .env_remove("TOWER_WORKSPACE_NAME")
        .env_remove("TOWER_ORGANIZATION_ID")
        .env_remove("TOWER_ORGANIZATION_NAME");
    cmd
}

#[test]
fn test_help_lists_resources() {
    let temp = TempDir::new().unwrap();
    tw_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compute-envs"))
        .stdout(predicate::str::contains("collaborators"));
}

#[test]
fn test_page_and_offset_conflict() {
    let temp = TempDir::new().unwrap();
    tw_cmd(&temp)
        .args(["collaborators", "list", "-o", "acme", "--page", "2", "--offset", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_reference_fails_before_network() {
    let temp = TempDir::new().unwrap();
    tw_cmd(&temp)
        .args(["compute-envs", "list", "-w", "acme/", "-u", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: Invalid reference 'acme/'"));
}

#[test]
fn test_unreachable_endpoint() {
    let temp = TempDir::new().unwrap();
    tw_cmd(&temp)
        .args(["info", "-u", "http://127.0.0.1:1", "-t", "token"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: Connection error"));
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "endpoint = [").unwrap();
    tw_cmd(&temp)
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Configuration error"));
}

#[test]
fn test_zero_page_rejected() {
    let temp = TempDir::new().unwrap();
    tw_cmd(&temp)
        .args(["teams", "list", "-o", "1", "--page", "0", "-u", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("page numbers start at 1"));
}
