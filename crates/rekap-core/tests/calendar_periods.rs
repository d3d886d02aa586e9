//! Integration tests for calendar queries and period resolution

use chrono::{Datelike, NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use rekap_core::{
    Holiday, MonthDay, PeriodError, PeriodSelector, SchoolCalendar, SemesterAnchors,
    SemesterWindow, YearMonth,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn calendar() -> SchoolCalendar {
    SchoolCalendar::new("2025/2026")
        .with_holiday(Holiday::single("Independence Day", date(2025, 8, 17)))
        .with_holiday(Holiday::new("Semester break", date(2025, 12, 25), date(2026, 1, 11)))
        .with_holiday(Holiday::new("Eid break", date(2026, 3, 18), date(2026, 3, 24)))
}

// =============================================================================
// Instructional days
// =============================================================================

#[test]
fn instructional_days_partition_the_range() {
    let calendar = calendar();
    let start = date(2025, 7, 1);
    let end = date(2026, 6, 30);
    let days = calendar.instructional_days_in_range(start, end);

    // Every returned date is instructional, in order, without repeats
    assert!(days.windows(2).all(|w| w[0] < w[1]));
    for day in &days {
        assert!(!calendar.is_weekend(*day));
        assert!(!calendar.is_holiday(*day));
    }

    // Every other date in range is excluded for a reason
    let excluded = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !days.contains(d))
        .count();
    let marked = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| calendar.day_mark(*d).is_some())
        .count();
    assert_eq!(excluded, marked);
}

#[test]
fn custom_weekend_rule() {
    let calendar = SchoolCalendar::default().with_weekend([Weekday::Fri, Weekday::Sat]);
    let days = calendar.instructional_days_in_range(date(2026, 1, 12), date(2026, 1, 18));
    let weekdays: Vec<Weekday> = days.iter().map(|d| d.weekday()).collect();
    assert_eq!(
        weekdays,
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Sun]
    );
}

// =============================================================================
// Period resolution
// =============================================================================

#[test]
fn semester_windows() {
    let calendar = calendar();
    let first = calendar.resolve(PeriodSelector::semester(1, 2025)).unwrap();
    assert_eq!((first.start(), first.end()), (date(2025, 7, 14), date(2025, 12, 24)));

    let second = calendar.resolve(PeriodSelector::semester(2, 2025)).unwrap();
    assert_eq!((second.start(), second.end()), (date(2026, 1, 12), date(2026, 6, 26)));
    assert_eq!(
        second.months().first().copied(),
        Some(YearMonth::new(2026, 1))
    );
}

#[test]
fn months_are_clipped_to_their_semester() {
    let calendar = calendar();

    let january = calendar.resolve(PeriodSelector::month(0, 2026)).unwrap();
    assert_eq!((january.start(), january.end()), (date(2026, 1, 12), date(2026, 1, 31)));

    let july = calendar.resolve(PeriodSelector::month(6, 2025)).unwrap();
    assert_eq!(july.start(), date(2025, 7, 14));

    // March lies fully inside semester 2
    let march = calendar.resolve(PeriodSelector::month(2, 2026)).unwrap();
    assert_eq!((march.start(), march.end()), (date(2026, 3, 1), date(2026, 3, 31)));
}

#[test]
fn clipping_can_be_disabled() {
    let calendar = calendar().without_month_clipping();
    let january = calendar.resolve(PeriodSelector::month(0, 2026)).unwrap();
    assert_eq!(january.start(), date(2026, 1, 1));
}

#[test]
fn custom_anchors_across_year_end() {
    // A first semester running August to January
    let anchors = SemesterAnchors {
        first: SemesterWindow::new(MonthDay::new(8, 1), MonthDay::new(1, 20)),
        second: SemesterWindow::new(MonthDay::new(2, 1), MonthDay::new(6, 30)),
    };
    let calendar = SchoolCalendar::default().with_semesters(anchors);
    let first = calendar.resolve(PeriodSelector::semester(1, 2025)).unwrap();
    assert_eq!((first.start(), first.end()), (date(2025, 8, 1), date(2026, 1, 20)));
    assert_eq!(first.months().len(), 6);
}

#[test]
fn invalid_selectors() {
    let calendar = calendar();
    assert_eq!(
        calendar.resolve(PeriodSelector::month(12, 2026)),
        Err(PeriodError::InvalidMonth(12))
    );
    assert_eq!(
        calendar.resolve(PeriodSelector::month(-1, 2026)),
        Err(PeriodError::InvalidMonth(-1))
    );
    assert_eq!(
        calendar.resolve(PeriodSelector::semester(0, 2025)),
        Err(PeriodError::InvalidSemester(0))
    );
    assert_eq!(
        calendar.resolve(PeriodSelector::semester(3, 2025)),
        Err(PeriodError::InvalidSemester(3))
    );
}
