//! End-to-end tests driving the built `versemend` binary, in the style of
//! a user session: init, inspect, repair. The provider URL points at a
//! loopback port with no listener so repair runs offline and fails fast.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn versemend_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("versemend");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/corpus.sqlite"

[provider]
base_url = "http://127.0.0.1:9"
bulk_timeout_secs = 1
verse_timeout_secs = 1
request_delay_ms = 0

[repair]
insert_retry_delay_ms = 0
checkpoint_retry_delay_ms = 0
"#,
        root.display()
    );

    let config_path = config_dir.join("versemend.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_versemend(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = versemend_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run versemend binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_versemend(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_versemend(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_versemend(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_sources_lists_seeded_sources() {
    let (_tmp, config_path) = setup_test_env();
    run_versemend(&config_path, &["init"]);

    let (stdout, stderr, success) = run_versemend(&config_path, &["sources"]);
    assert!(success, "sources failed: {}{}", stdout, stderr);
    assert!(stdout.contains("KJV"));
    assert!(stdout.contains("en-kjv"));
    assert!(stdout.contains("WEB"));
}

#[test]
fn test_stats_reports_canon_and_coverage() {
    let (_tmp, config_path) = setup_test_env();
    run_versemend(&config_path, &["init"]);

    let (stdout, stderr, success) = run_versemend(&config_path, &["stats"]);
    assert!(success, "stats failed: {}{}", stdout, stderr);
    assert!(stdout.contains("66 books"));
    assert!(stdout.contains("KJV"));
    assert!(stdout.contains("never"));
}

#[test]
fn test_repair_survives_unreachable_provider() {
    let (_tmp, config_path) = setup_test_env();
    run_versemend(&config_path, &["init"]);

    // Every fetch fails; the pass must still complete with a summary
    let (stdout, stderr, success) = run_versemend(&config_path, &["repair", "WEB"]);
    assert!(success, "repair failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("repair WEB (en-web)"));
    assert!(stdout.contains("added 0 verses"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_repair_rejects_unknown_source() {
    let (_tmp, config_path) = setup_test_env();
    run_versemend(&config_path, &["init"]);

    let (_, stderr, success) = run_versemend(&config_path, &["repair", "NIV"]);
    assert!(!success);
    assert!(stderr.contains("Unknown source"));
}

#[test]
fn test_repair_rejects_invalid_threshold() {
    let (_tmp, config_path) = setup_test_env();
    run_versemend(&config_path, &["init"]);

    let (_, stderr, success) = run_versemend(&config_path, &["repair", "--threshold", "1.5"]);
    assert!(!success);
    assert!(stderr.contains("threshold"));
}

#[test]
fn test_missing_config_is_a_clear_error() {
    let (tmp, _) = setup_test_env();
    let bogus = tmp.path().join("nope.toml");

    let (_, stderr, success) = run_versemend(&bogus, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("config"));
}
