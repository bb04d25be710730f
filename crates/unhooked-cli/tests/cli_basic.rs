//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data directory.
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "unhooked-cli", "--"])
        .args(args)
        .env("UNHOOKED_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

#[test]
fn test_tracker_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["tracker", "add", "Nicotine"]);
    assert!(out.contains("Tracker created:"));

    let out = run_cli_success(dir.path(), &["tracker", "list"]);
    assert!(out.contains("Nicotine"));
    assert!(out.contains("0 days clean"));
}

#[test]
fn test_backdated_add_grants_badges() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["tracker", "add", "Alcohol", "--start-date", "2024-01-01"],
    );
    assert!(out.contains("Badges already earned:"));
    assert!(out.contains("One Year"));
}

#[test]
fn test_status_json() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["tracker", "add", "Sugar", "--start-date", "2024-01-01"],
    );

    let out = run_cli_success(dir.path(), &["status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["tracker"]["name"], "Sugar");
    assert!(parsed["days_clean"].as_i64().unwrap() > 365);
    assert!(parsed["highest_badge"]["id"].is_string());
}

#[test]
fn test_checkin_and_sync() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["tracker", "add", "Nicotine"]);

    let out = run_cli_success(dir.path(), &["checkin"]);
    assert!(out.contains("Urge defeated. Total: 1"));

    let out = run_cli_success(dir.path(), &["sync"]);
    assert!(out.contains("Everything up to date"));
}

#[test]
fn test_badge_catalog_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["badge", "catalog", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let defs = parsed.as_array().unwrap();
    assert!(!defs.is_empty());
    assert_eq!(defs[0]["milestone_days"], 0);
}

#[test]
fn test_status_without_tracker_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["status"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no active tracker"));
}
