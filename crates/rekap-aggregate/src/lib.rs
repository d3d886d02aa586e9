//! # rekap-aggregate
//!
//! Per-student attendance aggregation over a reporting period.
//!
//! This crate provides:
//! - Instructional-day counting through the injected `SchoolCalendar`
//! - Same-day deduplication with a configurable tie-break
//! - Roster-ordered recaps, including students without any records
//! - Data-integrity diagnostics for everything dropped or flagged
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rekap_core::{AttendanceRecord, PeriodSelector, SchoolCalendar, Student};
//!
//! let calendar = SchoolCalendar::default();
//! let period = calendar.resolve(PeriodSelector::month(0, 2026)).unwrap();
//! let roster = vec![Student::new("s1", "01", "Ana")];
//! let records = vec![
//!     AttendanceRecord::new("s1", NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(), "H"),
//! ];
//!
//! let report = rekap_aggregate::aggregate(&roster, &records, &period, &calendar);
//! assert_eq!(report.recaps[0].present_count(), 1);
//! ```

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use rekap_core::{
    Aggregator, AttendanceRecord, AttendanceReport, AttendanceStatus, AuditSummary,
    CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, PeriodSpec, SchoolCalendar,
    Student, StudentRecap,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which of several same-day records for one student is kept
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first record in input order
    #[default]
    FirstWins,
    /// Keep the last record in input order
    LastWins,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "first_wins" | "first-wins" => Ok(DuplicatePolicy::FirstWins),
            "last" | "last_wins" | "last-wins" => Ok(DuplicatePolicy::LastWins),
            other => Err(format!("unknown duplicate policy '{other}' (expected first or last)")),
        }
    }
}

/// Default attendance aggregator
#[derive(Clone, Debug, Default)]
pub struct RecapAggregator {
    pub duplicate_policy: DuplicatePolicy,
}

impl RecapAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Resolve a same-day collision, returning (kept, dropped)
    fn settle(
        &self,
        slot: &mut AttendanceStatus,
        incoming: &AttendanceStatus,
    ) -> (AttendanceStatus, AttendanceStatus) {
        match self.duplicate_policy {
            DuplicatePolicy::FirstWins => (slot.clone(), incoming.clone()),
            DuplicatePolicy::LastWins => {
                let dropped = std::mem::replace(slot, incoming.clone());
                (incoming.clone(), dropped)
            }
        }
    }
}

impl Aggregator for RecapAggregator {
    fn aggregate(
        &self,
        roster: &[Student],
        records: &[AttendanceRecord],
        period: &PeriodSpec,
        calendar: &SchoolCalendar,
        emitter: &mut dyn DiagnosticEmitter,
    ) -> AttendanceReport {
        let instructional_days = calendar.instructional_days_in_range(period.start(), period.end());
        let mut audit = AuditSummary {
            records_in: records.len(),
            ..AuditSummary::default()
        };

        let roster_ids: HashSet<&str> = roster.iter().map(|s| s.id.as_str()).collect();
        let mut logs: HashMap<&str, BTreeMap<NaiveDate, AttendanceStatus>> = HashMap::new();
        // BTreeMap keeps unknown-student reporting in a stable order
        let mut unknown: BTreeMap<&str, usize> = BTreeMap::new();

        for record in records {
            if !period.contains(record.date) {
                audit.outside_period += 1;
                continue;
            }
            if !roster_ids.contains(record.student_id.as_str()) {
                *unknown.entry(record.student_id.as_str()).or_default() += 1;
                continue;
            }

            let log = logs.entry(record.student_id.as_str()).or_default();
            match log.entry(record.date) {
                Entry::Vacant(slot) => {
                    slot.insert(record.status.clone());
                }
                Entry::Occupied(mut slot) => {
                    audit.duplicates_dropped += 1;
                    let (kept, dropped) = self.settle(slot.get_mut(), &record.status);
                    warn!(
                        student = %record.student_id,
                        date = %record.date,
                        kept = %kept,
                        dropped = %dropped,
                        "duplicate attendance record"
                    );
                    emitter.emit(
                        Diagnostic::new(
                            DiagnosticCode::A001DuplicateRecord,
                            format!(
                                "duplicate record for student '{}' on {}: kept '{}', dropped '{}'",
                                record.student_id, record.date, kept, dropped
                            ),
                        )
                        .for_student(record.student_id.as_str())
                        .on(record.date),
                    );
                }
            }
        }

        for (student_id, count) in &unknown {
            audit.unknown_student += count;
            warn!(student = %student_id, records = *count, "records for student not on roster");
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::A002UnknownStudent,
                    format!(
                        "{count} record(s) reference student '{student_id}' who is not on the roster"
                    ),
                )
                .for_student(*student_id),
            );
        }

        if audit.outside_period > 0 {
            debug!(
                count = audit.outside_period,
                period = %period,
                "ignored records outside the period"
            );
        }

        let mut flagged: HashSet<&str> = HashSet::new();
        let recaps: Vec<StudentRecap> = roster
            .iter()
            .map(|student| {
                let log = logs.get(student.id.as_str()).cloned().unwrap_or_default();
                if flagged.insert(student.id.as_str()) {
                    flag_entries(student, &log, calendar, &mut audit, &mut *emitter);
                }
                StudentRecap::new(student.clone(), instructional_days.len(), log)
            })
            .collect();

        debug!(
            students = recaps.len(),
            instructional_days = instructional_days.len(),
            records = audit.records_in,
            dropped = audit.dropped(),
            "aggregated attendance"
        );

        AttendanceReport {
            period: *period,
            instructional_days,
            recaps,
            audit,
        }
    }
}

/// Report kept entries that are suspicious but still part of the log
fn flag_entries(
    student: &Student,
    log: &BTreeMap<NaiveDate, AttendanceStatus>,
    calendar: &SchoolCalendar,
    audit: &mut AuditSummary,
    emitter: &mut dyn DiagnosticEmitter,
) {
    for (date, status) in log {
        if let Some(mark) = calendar.day_mark(*date) {
            audit.on_non_instructional_day += 1;
            debug!(
                student = %student.id,
                date = %date,
                mark = mark.as_str(),
                "record on non-instructional day"
            );
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::A003NonInstructionalDay,
                    format!(
                        "student '{}' has a record on {} which is a {}",
                        student.id,
                        date,
                        mark.as_str()
                    ),
                )
                .for_student(student.id.as_str())
                .on(*date),
            );
        }
        if !status.is_recognized() {
            audit.unrecognized_status += 1;
            debug!(student = %student.id, date = %date, status = %status, "unrecognized status");
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::A004UnrecognizedStatus,
                    format!(
                        "student '{}' has unrecognized status '{}' on {}",
                        student.id, status, date
                    ),
                )
                .for_student(student.id.as_str())
                .on(*date),
            );
        }
    }
}

/// Aggregate with the default policy; diagnostics are only logged
pub fn aggregate(
    roster: &[Student],
    records: &[AttendanceRecord],
    period: &PeriodSpec,
    calendar: &SchoolCalendar,
) -> AttendanceReport {
    let mut emitter = CollectingEmitter::new();
    RecapAggregator::new().aggregate(roster, records, period, calendar, &mut emitter)
}
