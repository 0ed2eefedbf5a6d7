//! CLI integration tests
//!
//! Runs the built binary against takeoff files and checks output and exit
//! codes.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn sowgen(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sowgen"))
        .args(args)
        .env("SOWGEN_DATA_DIR", data_dir)
        .env_remove("SOWGEN_STORE_URL")
        .env_remove("SOWGEN_STORE_KEY")
        .env_remove("SOWGEN_LOG_LEVEL")
        .output()
        .expect("Failed to execute sowgen")
}

fn write_takeoff(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn valid_takeoff() -> Value {
    json!({
        "project_name": "Riverside Cold Storage",
        "address": "910 Riverside Industrial Blvd, Jacksonville FL",
        "roof_area": 38000,
        "membrane_type": "TPO",
        "fastening_pattern": "Mechanically Attached",
        "project_type": "tear-off",
        "deck_type": "Wood",
        "insulation_type": "Polyiso",
        "insulation_thickness": 3,
    })
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = sowgen(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["generate", "validate", "select", "check", "templates", "summary", "serve"] {
        assert!(stdout.contains(command), "missing {} in help", command);
    }
}

#[test]
fn test_templates_json() {
    let dir = TempDir::new().unwrap();
    let output = sowgen(dir.path(), &["templates", "--work-type", "recover", "-f", "json", "-q"]);

    assert!(output.status.success());
    let ids: Vec<String> = stdout_json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["template_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["T2", "T4", "T5"]);
}

#[test]
fn test_validate_exit_codes() {
    let dir = TempDir::new().unwrap();
    let good = write_takeoff(&dir, "good.json", &valid_takeoff());
    let bad = write_takeoff(&dir, "bad.json", &json!({ "project_name": "Missing everything" }));

    let output = sowgen(dir.path(), &["validate", good.to_str().unwrap(), "-q"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Takeoff data is valid"));

    let output = sowgen(dir.path(), &["validate", bad.to_str().unwrap(), "-f", "json", "-q"]);
    assert_eq!(output.status.code(), Some(1));
    let report = stdout_json(&output);
    assert_eq!(report["is_valid"], false);
    assert!(report["errors"]
        .as_array()
        .unwrap()
        .contains(&json!("Missing required field: address (Project address)")));
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = sowgen(dir.path(), &["validate", "does-not-exist.json", "-q"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read takeoff file"));
}

#[test]
fn test_select_and_check() {
    let dir = TempDir::new().unwrap();
    let path = write_takeoff(&dir, "takeoff.json", &valid_takeoff());

    let output = sowgen(dir.path(), &["select", path.to_str().unwrap(), "-f", "json", "-q"]);
    assert!(output.status.success());
    let selection = stdout_json(&output);
    assert_eq!(selection["template_id"], "T6");
    assert_eq!(selection["match_kind"], "deck_wildcard");

    let output = sowgen(dir.path(), &["check", "-t", "T6", path.to_str().unwrap(), "-q"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Template T6 is compatible"));

    let output = sowgen(dir.path(), &["check", "-t", "T2", path.to_str().unwrap(), "-q"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_summary_to_file() {
    let dir = TempDir::new().unwrap();
    let path = write_takeoff(&dir, "takeoff.json", &valid_takeoff());
    let out = dir.path().join("summary.json");

    let output = sowgen(
        dir.path(),
        &["summary", path.to_str().unwrap(), "-o", out.to_str().unwrap(), "-f", "json", "-q"],
    );

    assert!(output.status.success());
    let summary: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(summary["project_info"]["name"], "Riverside Cold Storage");
    assert_eq!(summary["sections"].as_array().unwrap().len(), 4);
}

#[test]
fn test_generate_then_status() {
    let dir = TempDir::new().unwrap();
    let path = write_takeoff(&dir, "takeoff.json", &valid_takeoff());
    let data_dir = dir.path().join("data");

    let output = sowgen(
        &data_dir,
        &["generate", path.to_str().unwrap(), "-f", "json", "-q"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let result = stdout_json(&output);
    assert_eq!(result["status"], "success");
    let workflow_id = result["workflow_id"].as_str().unwrap();

    let output = sowgen(&data_dir, &["status", workflow_id, "-f", "json", "-q"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], "completed");

    let output = sowgen(&data_dir, &["status", "00000000", "-q"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let dir = TempDir::new().unwrap();
    let output = sowgen(dir.path(), &["templates", "-q", "-v"]);

    assert!(!output.status.success());
}
