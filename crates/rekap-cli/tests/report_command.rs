//! End-to-end tests for the rekap binary

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn rekap(args: &[&str]) -> Output {
    let fixtures = fixtures_dir();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rekap"));
    cmd.env_remove("RUST_LOG");
    for arg in args {
        // Bare fixture names resolve against the fixtures directory
        if arg.ends_with(".json") || arg.ends_with(".toml") {
            cmd.arg(fixtures.join(arg));
        } else {
            cmd.arg(arg);
        }
    }
    cmd.output().expect("failed to execute rekap")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const INPUTS: [&str; 6] = [
    "--calendar",
    "calendar.toml",
    "--roster",
    "roster.json",
    "--records",
    "records.json",
];

// =============================================================================
// month
// =============================================================================

#[test]
fn month_report_writes_named_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_str().unwrap();

    let mut args = vec!["month", "--month", "1", "--year", "2026", "--cohort", "7A"];
    args.extend(INPUTS);
    args.extend(["--out-dir", out_dir]);
    let output = rekap(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let path = dir.path().join("monthly_attendance_7A_2026-01.xlsx");
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(stdout(&output).contains("3 students, 15 instructional days"));
}

#[test]
fn data_warnings_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("january.xlsx");

    let mut args = vec!["month", "--month", "1", "--year", "2026"];
    args.extend(INPUTS);
    args.extend(["--output", out.to_str().unwrap()]);
    let output = rekap(&args);

    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("warning[A001]"), "stderr: {err}");
    assert!(err.contains("warning[A002]"), "stderr: {err}");
    assert!(err.contains("2 data warning(s)"), "stderr: {err}");
    assert!(out.exists());
}

#[test]
fn quiet_hides_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("january.xlsx");

    let mut args = vec!["month", "--month", "1", "--year", "2026", "--quiet"];
    args.extend(INPUTS);
    args.extend(["--output", out.to_str().unwrap()]);
    let output = rekap(&args);

    assert!(output.status.success());
    assert!(!stderr(&output).contains("warning["));
}

#[test]
fn preview_prints_grid() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("january.xlsx");

    let mut args = vec!["month", "--month", "1", "--year", "2026", "--preview"];
    args.extend(INPUTS);
    args.extend(["--output", out.to_str().unwrap(), "--title", "Class 7A"]);
    let output = rekap(&args);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Class 7A"));
    assert!(text.contains("January 2026"));
    assert!(text.contains("Instructional Days"));
}

#[test]
fn invalid_month_is_rejected() {
    let mut args = vec!["month", "--month", "13", "--year", "2026"];
    args.extend(INPUTS);
    let output = rekap(&args);
    assert!(!output.status.success());
}

#[test]
fn group_width_is_bounded() {
    let mut args = vec!["month", "--month", "1", "--year", "2026", "--group-width", "11000"];
    args.extend(INPUTS);
    let output = rekap(&args);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--group-width"));
}

#[test]
fn missing_roster_reports_path() {
    let output = rekap(&[
        "month",
        "--month",
        "1",
        "--year",
        "2026",
        "--calendar",
        "calendar.toml",
        "--roster",
        "missing.json",
        "--records",
        "records.json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to read roster file"));
}

// =============================================================================
// semester
// =============================================================================

#[test]
fn semester_report_writes_named_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_str().unwrap();

    let mut args = vec![
        "semester",
        "--semester",
        "2",
        "--year",
        "2025",
        "--cohort",
        "7A",
        "--duplicates",
        "last",
    ];
    args.extend(INPUTS);
    args.extend(["--out-dir", out_dir]);
    let output = rekap(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let path = dir.path().join("semester_attendance_7A_2025-2026_sem2.xlsx");
    assert!(std::fs::read(path).unwrap().starts_with(b"PK"));
}

#[test]
fn invalid_semester_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["semester", "--semester", "3", "--year", "2025"];
    args.extend(INPUTS);
    args.extend(["--out-dir", dir.path().to_str().unwrap()]);
    let output = rekap(&args);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot resolve period"));
}

#[test]
fn out_of_range_year_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["semester", "--semester", "2", "--year", "2147483647"];
    args.extend(INPUTS);
    args.extend(["--out-dir", dir.path().to_str().unwrap()]);
    let output = rekap(&args);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Year out of range"));
}

// =============================================================================
// days
// =============================================================================

#[test]
fn days_for_clipped_month() {
    let output = rekap(&[
        "days",
        "--calendar",
        "calendar.toml",
        "--month",
        "1",
        "--year",
        "2026",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Period: 2026-01-12 to 2026-01-31"));
    assert!(text.contains("Calendar days: 20"));
    assert!(text.contains("Instructional days: 15"));
}

#[test]
fn days_list_skips_holidays() {
    let output = rekap(&[
        "days",
        "--calendar",
        "calendar.toml",
        "--month",
        "2",
        "--year",
        "2026",
        "--list",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    // 20 weekdays in February 2026, minus Lunar New Year
    assert!(text.contains("Instructional days: 19"));
    assert!(text.contains("2026-02-16 Mon"));
    assert!(!text.contains("2026-02-17"));
}

#[test]
fn days_requires_month_or_semester() {
    let output = rekap(&["days", "--calendar", "calendar.toml", "--year", "2026"]);
    assert!(!output.status.success());
}
