//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_dreadroom"))
        .args(args)
        .env("DREADROOM_HOME", home)
        .env_remove("DREADROOM_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every stdout line is JSON"))
        .collect()
}

#[test]
fn test_simulate_idle_player_dies() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["simulate"]);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let lines = json_lines(&stdout);
    let died: Vec<_> = lines.iter().filter(|v| v["type"] == "Died").collect();
    assert_eq!(died.len(), 1);
    assert_eq!(died[0]["at_ms"], 60_000);
    assert_eq!(died[0]["cause"], "exhausted");

    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["outcome"], "dead");
}

#[test]
fn test_simulate_scripted_escape() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--at", "0:look", "--at", "30000:key 538927E"],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let lines = json_lines(&stdout);
    assert!(lines.iter().any(|v| v["type"] == "Escaped"));
    assert!(!lines.iter().any(|v| v["type"] == "Died"));
    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["outcome"], "escaped");
    assert_eq!(snapshot["tension"]["degradation_level"], 50);
}

#[test]
fn test_simulate_disarm_holds_the_level() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--at", "0:look", "--at", "3000:disarm"],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let lines = json_lines(&stdout);
    let disarmed = lines.iter().find(|v| v["type"] == "Disarmed").unwrap();
    assert_eq!(disarmed["level"], 5);
    assert!(!lines.iter().any(|v| v["type"] == "Died"));
    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["outcome"], "playing");
    assert_eq!(snapshot["tension"]["state"], "disarmed");
}

#[test]
fn test_simulate_rejects_bad_step() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["simulate", "--at", "later:look"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_simulate_uses_config_file() {
    let home = tempfile::tempdir().unwrap();
    let cfg = home.path().join("custom.toml");
    std::fs::write(&cfg, "[tension]\nmax_degradation = 10\n").unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--config", cfg.to_str().unwrap()],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");
    let lines = json_lines(&stdout);
    let died = lines.iter().find(|v| v["type"] == "Died").unwrap();
    assert_eq!(died["at_ms"], 6_000);
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "tension.tick_period_ms", "900"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "tension.tick_period_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "tension.speed", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"));
}

#[test]
fn test_config_path_is_under_home() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
    assert!(stdout.contains(home.path().to_str().unwrap()));
}
