//! Institutional calendar
//!
//! A [`SchoolCalendar`] is built once per academic year and answers two
//! questions for the rest of the engine: which dates are instructional days,
//! and which concrete date range a month or semester selector stands for.
//!
//! Semester boundaries are configuration ([`SemesterAnchors`]), not code, so a
//! new academic year only needs a new calendar value.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::period::{PeriodSelector, PeriodSpec, YearMonth};
use crate::PeriodError;

// ============================================================================
// Day marks
// ============================================================================

/// Why a date is not an instructional day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMark {
    Holiday,
    Weekend,
}

impl DayMark {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayMark::Holiday => "holiday",
            DayMark::Weekend => "weekend",
        }
    }
}

// ============================================================================
// Holiday
// ============================================================================

/// A named non-instructional date range (inclusive)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HolidayEntry")]
pub struct Holiday {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Config form of a holiday: `end` may be omitted for single days
#[derive(Deserialize)]
struct HolidayEntry {
    #[serde(default)]
    name: String,
    #[serde(alias = "date")]
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl TryFrom<HolidayEntry> for Holiday {
    type Error = String;

    fn try_from(entry: HolidayEntry) -> Result<Self, Self::Error> {
        let end = entry.end.unwrap_or(entry.start);
        if end < entry.start {
            return Err(format!(
                "holiday '{}' ends ({}) before it starts ({})",
                entry.name, end, entry.start
            ));
        }
        Ok(Holiday {
            name: entry.name,
            start: entry.start,
            end,
        })
    }
}

impl Holiday {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start: start.min(end),
            end: end.max(start),
        }
    }

    pub fn single(name: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(name, date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

// ============================================================================
// Semester anchors
// ============================================================================

/// Month and day without a year, written `"MM-DD"`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Place this anchor in a concrete year
    pub fn on(self, year: i32) -> Result<NaiveDate, PeriodError> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or(PeriodError::InvalidAnchor {
            month: self.month,
            day: self.day,
            year,
        })
    }
}

impl TryFrom<String> for MonthDay {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let (month, day) = raw
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected MM-DD, got '{raw}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{raw}'"))?;
        let day: u32 = day.parse().map_err(|_| format!("invalid day in '{raw}'"))?;
        // 2024 is a leap year, so 02-29 is accepted here and checked per year later
        if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
            return Err(format!("'{raw}' is not a calendar day"));
        }
        Ok(MonthDay { month, day })
    }
}

impl From<MonthDay> for String {
    fn from(md: MonthDay) -> Self {
        format!("{:02}-{:02}", md.month, md.day)
    }
}

/// Start and end anchors of one semester
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SemesterWindow {
    pub const fn new(start: MonthDay, end: MonthDay) -> Self {
        Self { start, end }
    }

    /// Concrete range starting in `year`; an end anchor earlier in the year
    /// than the start anchor falls in the following year.
    pub fn in_year(&self, year: i32) -> Result<PeriodSpec, PeriodError> {
        let start = self.start.on(year)?;
        let mut end = self.end.on(year)?;
        if end < start {
            let next = year.checked_add(1).ok_or(PeriodError::InvalidYear(year))?;
            end = self.end.on(next)?;
        }
        PeriodSpec::new(start, end)
    }
}

/// Semester boundaries of an academic year.
///
/// Semester 1 starts in the base year, semester 2 in the year after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterAnchors {
    pub first: SemesterWindow,
    pub second: SemesterWindow,
}

impl Default for SemesterAnchors {
    fn default() -> Self {
        Self {
            first: SemesterWindow::new(MonthDay::new(7, 14), MonthDay::new(12, 24)),
            second: SemesterWindow::new(MonthDay::new(1, 12), MonthDay::new(6, 26)),
        }
    }
}

// ============================================================================
// SchoolCalendar
// ============================================================================

/// Instructional calendar for one academic year
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolCalendar {
    /// Human-readable name, e.g. "2025/2026"
    pub name: String,
    /// Days of the week without instruction
    pub weekend_days: Vec<Weekday>,
    /// Holiday dates and breaks
    pub holidays: Vec<Holiday>,
    /// Semester boundaries
    pub semesters: SemesterAnchors,
    /// Clip month reports to the semester containing the month
    pub clip_months_to_semester: bool,
}

impl Default for SchoolCalendar {
    fn default() -> Self {
        Self {
            name: "default".into(),
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            holidays: Vec::new(),
            semesters: SemesterAnchors::default(),
            clip_months_to_semester: true,
        }
    }
}

impl SchoolCalendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    /// Add single-day holidays in bulk
    pub fn with_holiday_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays
            .extend(dates.into_iter().map(|d| Holiday::single("", d)));
        self
    }

    pub fn with_weekend(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekend_days = days.into_iter().collect();
        self
    }

    pub fn with_semesters(mut self, anchors: SemesterAnchors) -> Self {
        self.semesters = anchors;
        self
    }

    pub fn without_month_clipping(mut self) -> Self {
        self.clip_months_to_semester = false;
        self
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend_days.contains(&date.weekday())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.contains(date))
    }

    /// Name of the first holiday covering `date`
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays
            .iter()
            .find(|h| h.contains(date))
            .map(|h| h.name.as_str())
    }

    /// Holiday wins over weekend when both apply
    pub fn day_mark(&self, date: NaiveDate) -> Option<DayMark> {
        if self.is_holiday(date) {
            Some(DayMark::Holiday)
        } else if self.is_weekend(date) {
            Some(DayMark::Weekend)
        } else {
            None
        }
    }

    /// Check if a date is an instructional day
    pub fn is_instructional_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Instructional days from `start` to `end` inclusive; empty when `start > end`
    pub fn instructional_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_instructional_day(*d))
            .collect()
    }

    /// First to last day of a month; `month_index` is 0-based
    pub fn month_range(&self, month_index: i32, year: i32) -> Result<PeriodSpec, PeriodError> {
        if !(0..=11).contains(&month_index) {
            return Err(PeriodError::InvalidMonth(month_index));
        }
        YearMonth::new(year, month_index as u32 + 1).period()
    }

    /// Semester 1 or 2 of the academic year starting in `base_year`
    pub fn semester_range(
        &self,
        semester_index: i32,
        base_year: i32,
    ) -> Result<PeriodSpec, PeriodError> {
        match semester_index {
            1 => self.semesters.first.in_year(base_year),
            2 => {
                let year = base_year
                    .checked_add(1)
                    .ok_or(PeriodError::InvalidYear(base_year))?;
                self.semesters.second.in_year(year)
            }
            other => Err(PeriodError::InvalidSemester(other)),
        }
    }

    /// Semester range overlapping the given month, if any.
    ///
    /// Both semesters of the previous and the current academic year are
    /// candidates, so anchors that wrap the year end are found too. The
    /// earliest overlapping semester wins.
    pub fn semester_containing(&self, month: &PeriodSpec) -> Option<PeriodSpec> {
        let year = month.start().year();
        let previous = year.checked_sub(1);
        [(1, previous), (2, previous), (1, Some(year)), (2, Some(year))]
            .into_iter()
            .filter_map(|(index, base)| self.semester_range(index, base?).ok())
            .find(|semester| semester.overlaps(month))
    }

    /// Resolve a selector into a concrete period.
    ///
    /// With `clip_months_to_semester`, a month report only covers the part of
    /// the month inside its semester (January starts on the first school day
    /// of semester 2, not on January 1st).
    pub fn resolve(&self, selector: PeriodSelector) -> Result<PeriodSpec, PeriodError> {
        match selector {
            PeriodSelector::Month { month_index, year } => {
                let month = self.month_range(month_index, year)?;
                if !self.clip_months_to_semester {
                    return Ok(month);
                }
                Ok(self
                    .semester_containing(&month)
                    .and_then(|semester| month.clip(&semester))
                    .unwrap_or(month))
            }
            PeriodSelector::Semester {
                semester_index,
                year,
            } => self.semester_range(semester_index, year),
        }
    }
}
