//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the data directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskboard"))
        .env("TASKBOARD_HOME", home)
        .env("TASKBOARD_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

fn list_ids(home: &Path, extra: &[&str]) -> Vec<i64> {
    let mut args = vec!["task", "list"];
    args.extend_from_slice(extra);
    let parsed: serde_json::Value = serde_json::from_str(&run_ok(home, &args)).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn test_add_list_done_delete() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let out = run_ok(
        home,
        &["task", "add", "Buy milk", "--due", "2024-01-10", "--start", "09:00", "--end", "10:00"],
    );
    assert!(out.contains("Task added!"));

    let parsed: serde_json::Value =
        serde_json::from_str(&run_ok(home, &["task", "list"])).unwrap();
    let task = &parsed[0];
    assert_eq!(task["id"], 1);
    assert_eq!(task["text"], "Buy milk");
    assert_eq!(task["priority"], "High");
    assert_eq!(task["due_date"], "2024-01-10");
    assert_eq!(task["start_time"], "09:00");
    assert_eq!(task["done"], false);

    let out = run_ok(home, &["task", "done", "1"]);
    assert!(out.contains("You earned a star!"));
    assert_eq!(run_ok(home, &["stars"]).trim(), "1");

    run_ok(home, &["task", "delete", "1"]);
    assert!(list_ids(home, &[]).is_empty());
    assert_eq!(run_ok(home, &["stars"]).trim(), "1");
}

#[test]
fn test_blank_text_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("Task cannot be empty"));
    assert!(list_ids(home.path(), &[]).is_empty());
}

#[test]
fn test_filter_and_reorder() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    run_ok(home, &["task", "add", "low", "--priority", "Low"]);
    run_ok(home, &["task", "add", "high", "--priority", "High"]);
    run_ok(home, &["task", "add", "medium", "--priority", "medium"]);

    assert_eq!(list_ids(home, &[]), vec![2, 3, 1]);
    assert_eq!(list_ids(home, &["--filter", "priority-only"]), vec![2]);
    assert_eq!(list_ids(home, &["--filter", "non-priority-only"]), vec![3, 1]);

    let out = run_ok(home, &["task", "reorder", "1", "2", "3"]);
    assert_eq!(out.trim(), "[1,2,3]");
    assert_eq!(list_ids(home, &[]), vec![1, 2, 3]);
    assert_eq!(list_ids(home, &["--no-order"]), vec![2, 3, 1]);

    run_ok(home, &["task", "reorder", "--reset"]);
    assert_eq!(list_ids(home, &[]), vec![2, 3, 1]);
}

#[test]
fn test_edit_and_clear_completed() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    run_ok(home, &["task", "add", "a"]);
    run_ok(home, &["task", "add", "b"]);

    run_ok(home, &["task", "edit", "1", "--text", "a2", "--done", "true"]);
    assert_eq!(run_ok(home, &["stars"]).trim(), "1");
    let out = run_ok(home, &["task", "edit", "9", "--text", "x"]);
    assert!(out.contains("Task not found: 9"));

    let out = run_ok(home, &["task", "clear-completed"]);
    assert!(out.contains("Cleared 1"));
    assert_eq!(list_ids(home, &[]), vec![2]);
}

#[test]
fn test_reflection_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    assert_eq!(
        run_ok(home, &["reflection", "get", "--date", "2024-01-10"]).trim(),
        ""
    );
    run_ok(home, &["reflection", "set", "Good day", "--date", "2024-01-10"]);
    assert_eq!(
        run_ok(home, &["reflection", "get", "--date", "2024-01-10"]).trim(),
        "Good day"
    );
}

#[test]
fn test_stats_and_calendar() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    run_ok(home, &["task", "add", "a", "--due", "2024-01-10", "--start", "09:00", "--end", "10:00"]);
    run_ok(home, &["task", "add", "b", "--priority", "Low", "--due", "2024-01-11"]);
    run_ok(home, &["task", "done", "1"]);

    let pie: serde_json::Value =
        serde_json::from_str(&run_ok(home, &["stats", "pie"])).unwrap();
    assert_eq!(pie.as_array().unwrap().len(), 2);

    let by_date: serde_json::Value =
        serde_json::from_str(&run_ok(home, &["stats", "by-date"])).unwrap();
    assert_eq!(by_date[0]["due_date"], "2024-01-10");
    assert_eq!(by_date[1]["count"], 1);

    let calendar: serde_json::Value =
        serde_json::from_str(&run_ok(home, &["calendar"])).unwrap();
    let first = calendar
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == "1")
        .unwrap();
    assert_eq!(first["title"], "a (High)");
    assert_eq!(first["start"], "2024-01-10T09:00");
    assert_eq!(first["allDay"], false);
}

#[test]
fn test_config_get_set_reset() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    assert_eq!(run_ok(home, &["config", "get", "ui.theme"]).trim(), "Dark");

    run_ok(home, &["config", "set", "defaults.priority", "Low"]);
    run_ok(home, &["task", "add", "x"]);
    let parsed: serde_json::Value =
        serde_json::from_str(&run_ok(home, &["task", "list"])).unwrap();
    assert_eq!(parsed[0]["priority"], "Low");

    let (code, _, stderr) = run_cli(home, &["config", "set", "ui.theme", "Neon"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    run_ok(home, &["config", "reset"]);
    assert_eq!(run_ok(home, &["config", "get", "defaults.priority"]).trim(), "High");
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["completions", "bash"]);
    assert!(out.contains("taskboard"));
}
