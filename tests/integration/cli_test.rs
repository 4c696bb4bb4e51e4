//! End-to-end tests of the binary in one-shot and check modes.
//!
//! All runs use `--mock`, so no network is needed.

use querylens::controller::VALIDATION_MESSAGE;
use serde_json::Value;
use std::process::Command;

/// Runs querylens with the given arguments, isolated from the user's config
/// and environment.
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_querylens"))
        .args(["--mock", "--config", "/nonexistent/querylens.toml"])
        .args(args)
        .env_remove("DATABASE_URL")
        .env_remove("QUERYLENS_ENDPOINT")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute querylens");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn test_once_prints_sections_in_order() {
    let (code, stdout, _) = run(&["-d", "postgres://db", "-p", "show users"]);

    assert_eq!(code, 0);
    assert!(stdout.starts_with("[sql/postgresql]"));
    let table = stdout.find("== 🔍 Query Result ==").unwrap();
    let query = stdout.find("== Generated Query ==").unwrap();
    assert!(table < query);
    assert!(stdout.contains("NULL"));
    assert!(stdout.contains("    SELECT id, name, email FROM users"));
    assert!(stdout.contains("2 section(s) in"));
}

#[test]
fn test_once_json_output() {
    let (code, stdout, _) = run(&[
        "--once",
        "-d",
        "postgres://db",
        "-p",
        "chart of orders",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["error"], false);
    let kinds: Vec<&str> = json["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["visual", "query_result", "generated_query", "notices"]
    );
}

#[test]
fn test_once_service_failure_exits_non_zero() {
    let (code, stdout, _) = run(&["-d", "postgres://db", "-p", "please fail"]);

    assert_eq!(code, 1);
    assert!(stdout.contains("== Error =="));
    assert!(stdout.contains("Mock service was asked to fail."));
}

#[test]
fn test_once_without_database_url_is_rejected() {
    let (code, stdout, stderr) = run(&["--once", "-p", "show users"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains(VALIDATION_MESSAGE));
}

#[test]
fn test_invalid_output_format() {
    let (code, _, stderr) = run(&["-d", "db", "-p", "x", "--output", "yaml"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid output format"));
}

#[test]
fn test_check_reports_greeting() {
    let (code, stdout, _) = run(&["--check"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Mock query service");
}

#[test]
fn test_zero_timeout_is_a_config_error() {
    let (code, _, stderr) = run(&["--check", "--timeout", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("timeout_secs must be greater than 0"));
}
