//! Roster and attendance record files (JSON)

use std::path::Path;

use anyhow::{Context, Result};
use rekap_core::{AttendanceRecord, Student};
use serde::de::DeserializeOwned;

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid {what} JSON in {}", path.display()))
}

/// Roster in display order
pub fn load_roster(path: &Path) -> Result<Vec<Student>> {
    let roster: Vec<Student> = read_json(path, "roster")?;
    tracing::debug!(students = roster.len(), "loaded roster");
    Ok(roster)
}

pub fn load_records(path: &Path) -> Result<Vec<AttendanceRecord>> {
    let records: Vec<AttendanceRecord> = read_json(path, "records")?;
    tracing::debug!(records = records.len(), "loaded attendance records");
    Ok(records)
}
