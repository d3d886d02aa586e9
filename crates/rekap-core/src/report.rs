//! Attendance recap types
//!
//! These are the outputs of aggregation and the inputs of grid layout.
//!
//! # Core Concepts
//!
//! - **StatusTally**: counts of the four tallied statuses
//! - **StudentRecap**: one student's statistics and daily log for a period
//! - **AttendanceReport**: all recaps of a roster plus the audit counters
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use rekap_core::{AttendanceStatus, Student, StudentRecap};
//!
//! let mut log = BTreeMap::new();
//! log.insert(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(), AttendanceStatus::Present);
//! log.insert(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(), AttendanceStatus::Sick);
//! log.insert(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(), AttendanceStatus::Present);
//!
//! let recap = StudentRecap::new(Student::new("s1", "01", "Ana"), 4, log);
//! assert_eq!(recap.present_count(), 2);
//! assert_eq!(recap.sick_count(), 1);
//! assert_eq!(recap.attendance_percentage, 50);
//! ```

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::period::{PeriodSpec, YearMonth};
use crate::{AttendanceStatus, Student};

// ============================================================================
// StatusTally
// ============================================================================

/// Counts per tallied status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub present: u32,
    pub sick: u32,
    pub excused: u32,
    pub unexcused: u32,
}

impl StatusTally {
    /// Count one status; unrecognized statuses are ignored
    pub fn record(&mut self, status: &AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Sick => self.sick += 1,
            AttendanceStatus::ExcusedAbsence => self.excused += 1,
            AttendanceStatus::UnexcusedAbsence => self.unexcused += 1,
            AttendanceStatus::Unrecognized(_) => {}
        }
    }

    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a AttendanceStatus>) -> Self {
        let mut tally = Self::default();
        for status in statuses {
            tally.record(status);
        }
        tally
    }

    pub fn total(&self) -> u32 {
        self.present + self.sick + self.excused + self.unexcused
    }

    /// Counts in `H, S, I, A` column order
    pub fn as_array(&self) -> [u32; 4] {
        [self.present, self.sick, self.excused, self.unexcused]
    }
}

// ============================================================================
// StudentRecap
// ============================================================================

/// `round(present / instructional_days * 100)`, clamped to `0..=100`.
///
/// Zero instructional days yields 0.
pub fn attendance_percentage(present: u32, instructional_days: usize) -> u8 {
    if instructional_days == 0 {
        return 0;
    }
    let pct = (f64::from(present) / instructional_days as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Aggregated attendance of one student over one period
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentRecap {
    pub student: Student,
    pub tally: StatusTally,
    /// Instructional days in the period (same for every student)
    pub instructional_days: usize,
    /// Percentage of instructional days present (0-100)
    pub attendance_percentage: u8,
    /// Deduplicated status per date, including unrecognized statuses
    pub daily_log: BTreeMap<NaiveDate, AttendanceStatus>,
}

impl StudentRecap {
    pub fn new(
        student: Student,
        instructional_days: usize,
        daily_log: BTreeMap<NaiveDate, AttendanceStatus>,
    ) -> Self {
        let tally = StatusTally::from_statuses(daily_log.values());
        Self {
            attendance_percentage: attendance_percentage(tally.present, instructional_days),
            student,
            tally,
            instructional_days,
            daily_log,
        }
    }

    pub fn present_count(&self) -> u32 {
        self.tally.present
    }

    pub fn sick_count(&self) -> u32 {
        self.tally.sick
    }

    pub fn excused_count(&self) -> u32 {
        self.tally.excused
    }

    pub fn unexcused_count(&self) -> u32 {
        self.tally.unexcused
    }

    pub fn status_on(&self, date: NaiveDate) -> Option<&AttendanceStatus> {
        self.daily_log.get(&date)
    }

    /// Re-tally only the log entries that fall in `month`
    pub fn month_tally(&self, month: YearMonth) -> StatusTally {
        match (month.first_day(), month.last_day()) {
            (Some(first), Some(last)) => {
                StatusTally::from_statuses(self.daily_log.range(first..=last).map(|(_, s)| s))
            }
            _ => StatusTally::default(),
        }
    }

    /// `YYYY-MM-DD` key built from the date's own components
    pub fn day_key(date: NaiveDate) -> String {
        format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
    }
}

// ============================================================================
// AttendanceReport
// ============================================================================

/// Counters for everything aggregation dropped or flagged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Records handed to the aggregator
    pub records_in: usize,
    /// Records dated outside the period (dropped)
    pub outside_period: usize,
    /// Same-day duplicates (dropped)
    pub duplicates_dropped: usize,
    /// Records for students not on the roster (dropped)
    pub unknown_student: usize,
    /// Records with a status outside the taxonomy (kept, not tallied)
    pub unrecognized_status: usize,
    /// Records dated on weekends or holidays (kept)
    pub on_non_instructional_day: usize,
}

impl AuditSummary {
    pub fn dropped(&self) -> usize {
        self.outside_period + self.duplicates_dropped + self.unknown_student
    }
}

/// Aggregation result for one roster and period
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub period: PeriodSpec,
    pub instructional_days: Vec<NaiveDate>,
    /// One recap per roster student, in roster order
    pub recaps: Vec<StudentRecap>,
    pub audit: AuditSummary,
}

impl AttendanceReport {
    pub fn instructional_day_count(&self) -> usize {
        self.instructional_days.len()
    }

    pub fn recap_for(&self, student_id: &str) -> Option<&StudentRecap> {
        self.recaps.iter().find(|r| r.student.id == student_id)
    }
}
