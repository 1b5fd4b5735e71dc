//! Integration tests for the scheduler binary's CLI surface. Anything
//! that needs a live metadata store, time-series store, or queue broker
//! belongs in the component crates' own `tests/`, not here.

use std::process::Command;

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_nugettrends-scheduler"))
        .arg("--version")
        .output()
        .expect("failed to execute nugettrends-scheduler");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nugettrends-scheduler"));
}

#[test]
fn test_cli_help_lists_job_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_nugettrends-scheduler"))
        .arg("--help")
        .output()
        .expect("failed to execute nugettrends-scheduler");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run-catalog"));
    assert!(stdout.contains("run-publisher"));
    assert!(stdout.contains("run-trending"));
    assert!(stdout.contains("run-tfm"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let output = Command::new(env!("CARGO_BIN_EXE_nugettrends-scheduler"))
        .arg("not-a-real-job")
        .output()
        .expect("failed to execute nugettrends-scheduler");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}
