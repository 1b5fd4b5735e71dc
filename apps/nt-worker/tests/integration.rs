//! Integration tests for the worker binary's CLI surface. Anything that
//! needs a live metadata store, time-series store, or queue broker
//! belongs in `nt-download-worker`'s own `tests/`, not here.

use std::process::Command;

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_nugettrends-worker"))
        .arg("--version")
        .output()
        .expect("failed to execute nugettrends-worker");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nugettrends-worker"));
}

#[test]
fn test_cli_help_lists_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_nugettrends-worker"))
        .arg("--help")
        .output()
        .expect("failed to execute nugettrends-worker");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--json"));
    assert!(stdout.contains("--package-index-url-template"));
}
