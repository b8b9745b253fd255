//! Integration tests for the `booking` CLI binary.
//!
//! These exercise the calendar, slots, and status subcommands through the
//! actual binary, with "today" pinned to Monday 2025-07-14.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the salon.json fixture.
fn salon_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/salon.json")
}

/// Helper: read the salon.json fixture as a string.
fn salon_json() -> String {
    std::fs::read_to_string(salon_json_path()).expect("salon.json fixture must exist")
}

/// Helper: the binary with BOOKING_* environment cleared.
fn booking() -> Command {
    let mut cmd = Command::cargo_bin("booking").unwrap();
    cmd.env_remove("BOOKING_HORIZON_DAYS")
        .env_remove("BOOKING_GRID_STEP")
        .env_remove("BOOKING_CACHE_TTL_SECS")
        .env_remove("BOOKING_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be valid JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// calendar
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn calendar_covers_default_horizon() {
    let output = booking()
        .args(["calendar", "-i", salon_json_path(), "--duration", "45", "--today", "2025-07-14"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let calendar = stdout_json(&output);
    let map = calendar.as_object().unwrap();
    assert_eq!(map.len(), 60);
    assert_eq!(calendar["2025-07-14"], "available");
    assert_eq!(calendar["2025-07-16"], "available");
    assert_eq!(calendar["2025-07-17"], "fully_booked");
    assert_eq!(calendar["2025-07-19"], "closed");
    assert_eq!(calendar["2025-07-20"], "closed");
}

#[test]
fn calendar_honours_horizon_flag() {
    let output = booking()
        .args([
            "calendar",
            "-i",
            salon_json_path(),
            "--duration",
            "45",
            "--today",
            "2025-07-14",
            "--horizon-days",
            "7",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output).as_object().unwrap().len(), 7);
}

#[test]
fn calendar_horizon_from_environment() {
    let output = booking()
        .env("BOOKING_HORIZON_DAYS", "10")
        .args(["calendar", "-i", salon_json_path(), "--duration", "45", "--today", "2025-07-14"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output).as_object().unwrap().len(), 10);
}

#[test]
fn calendar_reads_profile_from_stdin() {
    booking()
        .args(["calendar", "--duration", "45", "--today", "2025-07-14", "--horizon-days", "3"])
        .write_stdin(salon_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2025-07-16\": \"available\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_lists_grid_aligned_gaps() {
    let output = booking()
        .args([
            "slots",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-15",
            "--duration",
            "45",
            "--today",
            "2025-07-14",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slots = stdout_json(&output);
    let starts: Vec<&str> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["09:45", "11:15", "12:00", "17:15"]);
    assert_eq!(slots[0]["end"], "10:30");
    assert_eq!(slots[0]["duration"], 45);
}

#[test]
fn slots_with_finer_grid_step() {
    let output = booking()
        .args([
            "slots",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-16",
            "--duration",
            "45",
            "--grid-step",
            "15",
            "--today",
            "2025-07-14",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slots = stdout_json(&output);
    let starts: Vec<&str> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap())
        .collect();
    // 12:00-13:00 gap fits 12:00 and 12:15; 17:30-18:00 is too short.
    assert_eq!(starts, vec!["12:00", "12:15"]);
}

#[test]
fn slots_on_closed_date_is_empty_list() {
    booking()
        .args([
            "slots",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-19",
            "--duration",
            "45",
            "--today",
            "2025-07-14",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

// ─────────────────────────────────────────────────────────────────────────────
// status
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn status_reports_closure_reason() {
    let output = booking()
        .args([
            "status",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-19",
            "--duration",
            "45",
            "--today",
            "2025-07-14",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["date"], "2025-07-19");
    assert_eq!(report["status"], "closed");
    assert_eq!(report["reason"], "special_closure");
}

#[test]
fn status_of_past_date_is_closed() {
    let output = booking()
        .args([
            "status",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-11",
            "--duration",
            "45",
            "--today",
            "2025-07-14",
        ])
        .output()
        .unwrap();

    let report = stdout_json(&output);
    assert_eq!(report["status"], "closed");
    assert_eq!(report["reason"], "past");
}

#[test]
fn status_of_full_day_has_no_reason() {
    let output = booking()
        .args([
            "status",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-17",
            "--duration",
            "45",
            "--today",
            "2025-07-14",
        ])
        .output()
        .unwrap();

    let report = stdout_json(&output);
    assert_eq!(report["status"], "fully_booked");
    assert!(report.get("reason").is_none());
}

#[test]
fn status_with_timezone_succeeds() {
    booking()
        .args([
            "status",
            "-i",
            salon_json_path(),
            "--date",
            "2025-07-15",
            "--duration",
            "45",
            "--timezone",
            "Europe/Stockholm",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_file_fails_with_context() {
    booking()
        .args(["calendar", "-i", "/nonexistent/profile.json", "--duration", "45"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn malformed_profile_fails() {
    booking()
        .args(["calendar", "--duration", "45", "--today", "2025-07-14"])
        .write_stdin(r#"{ "business_hours": { "start": "9am", "end": "18:00" } }"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse availability profile JSON"));
}

#[test]
fn invalid_date_fails() {
    booking()
        .args(["slots", "-i", salon_json_path(), "--date", "15/07/2025", "--duration", "45"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn unknown_timezone_fails() {
    booking()
        .args(["status", "-i", salon_json_path(), "--date", "2025-07-15", "--duration", "45", "--timezone", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

#[test]
fn zero_duration_is_rejected() {
    booking()
        .args(["calendar", "-i", salon_json_path(), "--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--duration must be greater than 0"));
}

#[test]
fn zero_grid_step_is_rejected() {
    booking()
        .args(["calendar", "-i", salon_json_path(), "--duration", "45", "--grid-step", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid_step"));
}

#[test]
fn today_and_timezone_conflict() {
    booking()
        .args([
            "calendar",
            "-i",
            salon_json_path(),
            "--duration",
            "45",
            "--today",
            "2025-07-14",
            "--timezone",
            "UTC",
        ])
        .assert()
        .failure();
}

#[test]
fn no_subcommand_prints_usage() {
    booking()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
