//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Port to listen on"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_serve_rejects_bad_port_env() {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("serve").env("PORT", "not-a-port");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn test_check_fails_without_server() {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    // Nothing listens on port 1
    cmd.arg("check")
        .arg("--url")
        .arg("http://127.0.0.1:1/api")
        .arg("--timeout")
        .arg("2");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach"));
}
