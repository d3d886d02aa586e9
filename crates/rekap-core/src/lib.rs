//! # rekap-core
//!
//! Core domain model and traits for the rekap attendance reporting engine.
//!
//! This crate provides:
//! - Domain types: `Student`, `AttendanceRecord`, `AttendanceStatus`
//! - The institutional calendar: `SchoolCalendar`, `Holiday`, `SemesterAnchors`
//! - Reporting periods: `PeriodSelector`, `PeriodSpec`, `YearMonth`
//! - Aggregation results: `StudentRecap`, `AttendanceReport`, `StatusTally`
//! - Core traits: `Aggregator`, `DiagnosticEmitter`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rekap_core::{Holiday, PeriodSelector, SchoolCalendar};
//!
//! let calendar = SchoolCalendar::new("2025/2026").with_holiday(Holiday::single(
//!     "Independence Day",
//!     NaiveDate::from_ymd_opt(2025, 8, 17).unwrap(),
//! ));
//!
//! let period = calendar.resolve(PeriodSelector::semester(1, 2025)).unwrap();
//! assert_eq!(period.start(), NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
//! assert_eq!(period.end(), NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
//!
//! let school_days = calendar.instructional_days_in_range(period.start(), period.end());
//! assert!(school_days.len() < period.len_days());
//! ```

pub mod calendar;
pub mod diagnostics;
pub mod period;
pub mod report;

pub use calendar::{DayMark, Holiday, MonthDay, SchoolCalendar, SemesterAnchors, SemesterWindow};
pub use diagnostics::{CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity};
pub use period::{PeriodSelector, PeriodSpec, YearMonth};
pub use report::{attendance_percentage, AttendanceReport, AuditSummary, StatusTally, StudentRecap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a student
pub type StudentId = String;

// ============================================================================
// Student
// ============================================================================

/// A roster entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier, referenced by attendance records
    pub id: StudentId,
    /// Human-facing roll number
    #[serde(alias = "display_id")]
    pub roll_id: String,
    /// Full name
    pub name: String,
}

impl Student {
    pub fn new(id: impl Into<String>, roll_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roll_id: roll_id.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// Attendance
// ============================================================================

/// Attendance status for one student on one day.
///
/// Raw values that do not belong to the four-way taxonomy are preserved as
/// `Unrecognized`; they appear in a student's daily log but are never tallied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    /// Present (H)
    Present,
    /// Sick (S)
    Sick,
    /// Excused absence (I)
    ExcusedAbsence,
    /// Unexcused absence (A)
    UnexcusedAbsence,
    /// Anything else found in the source data
    Unrecognized(String),
}

impl AttendanceStatus {
    /// The four tallied statuses, in report column order
    pub const TALLIED: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Sick,
        AttendanceStatus::ExcusedAbsence,
        AttendanceStatus::UnexcusedAbsence,
    ];

    /// Single-letter code used in report cells and sub-column headers
    pub fn code(&self) -> &str {
        match self {
            AttendanceStatus::Present => "H",
            AttendanceStatus::Sick => "S",
            AttendanceStatus::ExcusedAbsence => "I",
            AttendanceStatus::UnexcusedAbsence => "A",
            AttendanceStatus::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// English label
    pub fn label(&self) -> &str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Sick => "Sick",
            AttendanceStatus::ExcusedAbsence => "Excused",
            AttendanceStatus::UnexcusedAbsence => "Unexcused",
            AttendanceStatus::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Whether the status belongs to the tallied taxonomy
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AttendanceStatus::Unrecognized(_))
    }

    /// Parse a raw status value. Never fails: unknown input is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "h" | "present" | "hadir" => AttendanceStatus::Present,
            "s" | "sick" | "sakit" => AttendanceStatus::Sick,
            "i" | "excused" | "excusedabsence" | "excused_absence" | "izin" => {
                AttendanceStatus::ExcusedAbsence
            }
            "a" | "unexcused" | "unexcusedabsence" | "unexcused_absence" | "alpa" | "alpha" => {
                AttendanceStatus::UnexcusedAbsence
            }
            _ => AttendanceStatus::Unrecognized(raw.to_string()),
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(raw: String) -> Self {
        AttendanceStatus::parse(&raw)
    }
}

impl From<&str> for AttendanceStatus {
    fn from(raw: &str) -> Self {
        AttendanceStatus::parse(raw)
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Unrecognized(raw) => raw,
            other => other.code().to_string(),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One raw attendance entry.
///
/// `date` is the authoritative local calendar date; it is never converted
/// through a zoned timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(
        student_id: impl Into<String>,
        date: NaiveDate,
        status: impl Into<AttendanceStatus>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            status: status.into(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Per-student attendance aggregation over one reporting period
pub trait Aggregator: Send + Sync {
    /// Aggregate `records` for every roster student, in roster order.
    ///
    /// Data-integrity problems (duplicates, unknown students) never abort the
    /// aggregation; they are reported through `emitter`.
    fn aggregate(
        &self,
        roster: &[Student],
        records: &[AttendanceRecord],
        period: &PeriodSpec,
        calendar: &SchoolCalendar,
        emitter: &mut dyn DiagnosticEmitter,
    ) -> AttendanceReport;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid period selector or calendar anchor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid month index {0}: expected 0..=11")]
    InvalidMonth(i32),

    #[error("Invalid semester index {0}: expected 1 or 2")]
    InvalidSemester(i32),

    #[error("Year out of range: {0}")]
    InvalidYear(i32),

    #[error("Invalid calendar anchor {month:02}-{day:02} in {year}")]
    InvalidAnchor { month: u32, day: u32, year: i32 },

    #[error("Period start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

// ============================================================================
// Tests
// ============================================================================
