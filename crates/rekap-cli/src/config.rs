//! Calendar configuration loading
//!
//! The school calendar is read from TOML (or JSON when the file ends in
//! `.json`). Every key is optional; a missing file section falls back to the
//! default Saturday/Sunday weekend and the default semester anchors.

use std::path::Path;

use anyhow::{Context, Result};
use rekap_core::SchoolCalendar;

/// Load a calendar file, choosing the format from the extension
pub fn load_calendar(path: &Path) -> Result<SchoolCalendar> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read calendar file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let calendar = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid calendar JSON in {}", path.display()))?
    } else {
        parse_calendar(&content)
            .with_context(|| format!("Invalid calendar TOML in {}", path.display()))?
    };

    tracing::debug!(
        path = %path.display(),
        holidays = calendar.holidays.len(),
        "loaded calendar"
    );
    Ok(calendar)
}

/// Parse a TOML calendar document
pub fn parse_calendar(content: &str) -> Result<SchoolCalendar> {
    Ok(toml::from_str(content)?)
}
