//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("ambulance-wl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("ambulance-wl").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--memory"));
}

#[test]
fn test_seed_requires_name() {
    let mut cmd = Command::cargo_bin("ambulance-wl").unwrap();
    cmd.arg("seed");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--name"));
}
