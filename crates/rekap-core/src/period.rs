//! Reporting periods
//!
//! A report covers either one calendar month or one academic semester. The
//! caller names the period with a [`PeriodSelector`]; the
//! [`SchoolCalendar`](crate::SchoolCalendar) resolves it into a concrete,
//! inclusive [`PeriodSpec`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::PeriodError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// Selector
// ============================================================================

/// Caller-facing period request.
///
/// Indexes are signed so that negative input reaches validation and is
/// reported as an invalid argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodSelector {
    /// Calendar month, `month_index` in `0..=11`
    Month { month_index: i32, year: i32 },
    /// Academic semester (1 or 2) of the academic year starting in `year`
    Semester { semester_index: i32, year: i32 },
}

impl PeriodSelector {
    pub fn month(month_index: i32, year: i32) -> Self {
        PeriodSelector::Month { month_index, year }
    }

    pub fn semester(semester_index: i32, year: i32) -> Self {
        PeriodSelector::Semester {
            semester_index,
            year,
        }
    }

    pub fn is_month(&self) -> bool {
        matches!(self, PeriodSelector::Month { .. })
    }

    /// Compact identifier used in artifact names, e.g. `2026-01` or `2025-2026_sem2`
    pub fn slug(&self) -> String {
        match *self {
            PeriodSelector::Month { month_index, year } => {
                format!("{year}-{:02}", i64::from(month_index) + 1)
            }
            PeriodSelector::Semester {
                semester_index,
                year,
            } => format!("{year}-{}_sem{semester_index}", i64::from(year) + 1),
        }
    }
}

// ============================================================================
// PeriodSpec
// ============================================================================

/// Inclusive date range; `start <= end` always holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodSpec {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodSpec {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days, both ends included
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every calendar date in the period, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }

    /// Distinct months touched by the period, chronologically
    pub fn months(&self) -> Vec<YearMonth> {
        let last = YearMonth::of(self.end);
        let mut months = Vec::new();
        let mut current = YearMonth::of(self.start);
        while current <= last {
            months.push(current);
            match current.next() {
                Some(next) => current = next,
                None => break,
            }
        }
        months
    }

    /// Intersection with another period, if any
    pub fn clip(&self, other: &PeriodSpec) -> Option<PeriodSpec> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        PeriodSpec::new(start, end).ok()
    }

    pub fn overlaps(&self, other: &PeriodSpec) -> bool {
        self.clip(other).is_some()
    }
}

impl std::fmt::Display for PeriodSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// ============================================================================
// YearMonth
// ============================================================================

/// A calendar month. Ordering is `(year, month)`, so sorting stays
/// chronological across a December/January boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month number
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Following month; `None` past the last representable year
    pub fn next(self) -> Option<Self> {
        if self.month >= 12 {
            Some(Self::new(self.year.checked_add(1)?, 1))
        } else {
            Some(Self::new(self.year, self.month + 1))
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next()?.first_day()?.pred_opt()
    }

    /// Full range of the month
    pub fn period(self) -> Result<PeriodSpec, PeriodError> {
        match (self.first_day(), self.last_day()) {
            (Some(start), Some(end)) => PeriodSpec::new(start, end),
            _ => Err(PeriodError::InvalidYear(self.year)),
        }
    }

    /// English month name
    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        YearMonth::of(date) == self
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}
