//! Integration tests for the telemed CLI

use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

fn telemed(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_telemed"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = telemed(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("telemed"));
    assert!(stdout.contains("Symptom checker"));
    assert!(stdout.contains("doctors"));
}

/// Test analyze prints the ranked suggestions
#[test]
fn test_analyze_command() {
    let output = telemed(&["analyze", "fever and body aches and fatigue"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Analysis Results"));
    assert!(stdout.contains("Flu"));
    assert!(stdout.contains("50.00%"));
}

/// Test analyze with no matching symptoms prints an empty suggestion list as JSON
#[test]
fn test_analyze_json_no_matches() {
    let output = telemed(&["analyze", "--json", "xyzzy"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report, serde_json::json!({"suggestions": []}));
}

/// Test remedies fall back for unknown conditions
#[test]
fn test_remedies_command() {
    let output = telemed(&["remedies", "Unknown Condition"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("Rest and stay hydrated"));
}

/// Test doctor search with literal coordinates needs no geocoding service
#[test]
fn test_doctors_with_coordinates() {
    let output = telemed(&[
        "doctors",
        "--location",
        "39.7817,-89.6501",
        "--specialization",
        "cardiology",
        "--radius",
        "10",
        "--json",
    ]);

    assert!(output.status.success());
    let providers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let providers = providers.as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["name"], "Dr. Michael Brown");
}

/// Test doctor search outside every fixture's distance
#[test]
fn test_doctors_small_radius() {
    let output = telemed(&[
        "doctors",
        "--location",
        "39.7817,-89.6501",
        "--specialization",
        "Cardiology",
        "--radius",
        "1",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No doctors found in your area"));
}

/// Test error handling for empty location
#[test]
fn test_doctors_empty_location_error() {
    let output = telemed(&["doctors", "--location", ""]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please enter a location"));
}

/// Test that an unknown specialization is reported but still searched
#[test]
fn test_doctors_unknown_specialization_warns() {
    let output = telemed(&[
        "doctors",
        "--location",
        "39.7817,-89.6501",
        "--specialization",
        "Astrology",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("No doctors found in your area"));
    assert!(stderr.contains("Unknown specialization"));
}

/// Test that invalid configuration is reported in user-facing terms
#[test]
fn test_invalid_config_error_message() {
    let output = Command::new(env!("CARGO_BIN_EXE_telemed"))
        .args(["analyze", "cough"])
        .env_remove("RUST_LOG")
        .env("TELEMED_ANALYSIS__MAX_SUGGESTIONS", "7")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error: Analysis max suggestions must be between 1 and 3"));
    assert!(stderr.contains("Please check your config file"));
}

/// Test that listen exits once its timeout passes even while stdin stays open
#[test]
fn test_listen_exits_after_timeout() {
    let started = Instant::now();
    let mut child = Command::new(env!("CARGO_BIN_EXE_telemed"))
        .arg("listen")
        .env_remove("RUST_LOG")
        .env("TELEMED_VOICE__LISTEN_TIMEOUT_SECONDS", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    // held open so the read never finishes on its own
    let stdin = child.stdin.take();

    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if started.elapsed() > Duration::from_secs(4) {
            child.kill().unwrap();
            panic!("listen still running {:?} after a 1s timeout", started.elapsed());
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(!status.success());
    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No speech detected"));
    drop(stdin);
}

/// Test listing specializations
#[test]
fn test_specializations_command() {
    let output = telemed(&["specializations"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("General Medicine"));
    assert!(stdout.contains("Gynecology"));
    assert!(stdout.contains("5, 10, 20, 50"));
}
