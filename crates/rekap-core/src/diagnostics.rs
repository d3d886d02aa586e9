//! Data-integrity diagnostics
//!
//! Problems in the input data never abort a report. Duplicate same-day
//! entries, records for students missing from the roster and similar issues
//! are resolved by a fixed policy and reported here so the caller can log,
//! count or display them.
//!
//! | Code | Severity | Meaning |
//! |------|----------|---------|
//! | A001 | Warning | Duplicate record for the same student and day (dropped) |
//! | A002 | Warning | Records reference a student absent from the roster (dropped) |
//! | A003 | Info | Record dated on a weekend or holiday (kept) |
//! | A004 | Info | Record status outside the H/S/I/A taxonomy (kept, not tallied) |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::StudentId;

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    A001DuplicateRecord,
    A002UnknownStudent,
    A003NonInstructionalDay,
    A004UnrecognizedStatus,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::A001DuplicateRecord => "A001",
            DiagnosticCode::A002UnknownStudent => "A002",
            DiagnosticCode::A003NonInstructionalDay => "A003",
            DiagnosticCode::A004UnrecognizedStatus => "A004",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::A001DuplicateRecord | DiagnosticCode::A002UnknownStudent => {
                Severity::Warning
            }
            DiagnosticCode::A003NonInstructionalDay | DiagnosticCode::A004UnrecognizedStatus => {
                Severity::Info
            }
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reported data problem
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub student_id: Option<StudentId>,
    pub date: Option<NaiveDate>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            student_id: None,
            date: None,
        }
    }

    pub fn for_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Sink for diagnostics
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Emitter that keeps every diagnostic in memory
#[derive(Clone, Debug, Default)]
pub struct CollectingEmitter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics with the given code
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= Severity::Warning)
    }
}

impl DiagnosticEmitter for CollectingEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_severities() {
        assert_eq!(
            Diagnostic::new(DiagnosticCode::A001DuplicateRecord, "dup").severity,
            Severity::Warning
        );
        assert_eq!(
            Diagnostic::new(DiagnosticCode::A003NonInstructionalDay, "weekend").severity,
            Severity::Info
        );
    }

    #[test]
    fn display_format() {
        let diag = Diagnostic::new(DiagnosticCode::A002UnknownStudent, "student 'x' not on roster")
            .for_student("x");
        assert_eq!(diag.to_string(), "warning[A002]: student 'x' not on roster");
    }

    #[test]
    fn collecting_emitter_counts() {
        let mut emitter = CollectingEmitter::new();
        emitter.emit(Diagnostic::new(DiagnosticCode::A003NonInstructionalDay, "a"));
        assert!(!emitter.has_warnings());

        emitter.emit(Diagnostic::new(DiagnosticCode::A001DuplicateRecord, "b"));
        emitter.emit(Diagnostic::new(DiagnosticCode::A001DuplicateRecord, "c"));
        assert!(emitter.has_warnings());
        assert_eq!(emitter.count(DiagnosticCode::A001DuplicateRecord), 2);
        assert_eq!(emitter.count(DiagnosticCode::A002UnknownStudent), 0);
    }
}
