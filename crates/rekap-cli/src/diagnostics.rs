//! Diagnostic output for the CLI
//!
//! `TerminalEmitter` prints rustc-style lines to stderr:
//!
//! ```text
//! warning[A001]: duplicate record for student 's1' on 2026-01-13: kept 'H', dropped 'S'
//!   --> student s1, 2026-01-13
//! ```
//!
//! Data-integrity diagnostics never change the exit code. Info-level
//! diagnostics (records on non-instructional days, unrecognized statuses)
//! are only shown with `-v`.

use std::io::Write;

use rekap_core::{Diagnostic, DiagnosticEmitter, Severity};

/// What the terminal emitter prints
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticConfig {
    /// Print nothing
    pub quiet: bool,
    /// Include info-level diagnostics
    pub show_info: bool,
}

impl DiagnosticConfig {
    pub fn should_show(&self, severity: Severity) -> bool {
        if self.quiet {
            return false;
        }
        severity > Severity::Info || self.show_info
    }
}

/// Terminal emitter writing to any `Write` (stderr in the binary)
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    warning_count: usize,
    suppressed: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            warning_count: 0,
            suppressed: 0,
        }
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Diagnostics hidden by the config
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        if diagnostic.severity >= Severity::Warning {
            self.warning_count += 1;
        }
        if !self.config.should_show(diagnostic.severity) {
            self.suppressed += 1;
            return Ok(());
        }

        writeln!(self.writer, "{diagnostic}")?;
        match (&diagnostic.student_id, diagnostic.date) {
            (Some(student), Some(date)) => {
                writeln!(self.writer, "  --> student {student}, {date}")?;
            }
            (Some(student), None) => writeln!(self.writer, "  --> student {student}")?,
            (None, Some(date)) => writeln!(self.writer, "  --> {date}")?,
            (None, None) => {}
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        // stderr may be closed
        let _ = self.write_diagnostic(&diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rekap_core::DiagnosticCode;

    fn duplicate() -> Diagnostic {
        Diagnostic::new(DiagnosticCode::A001DuplicateRecord, "duplicate record")
            .for_student("s1")
            .on(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap())
    }

    fn weekend() -> Diagnostic {
        Diagnostic::new(DiagnosticCode::A003NonInstructionalDay, "record on a weekend")
            .for_student("s1")
    }

    fn output(emitter: TerminalEmitter<Vec<u8>>) -> String {
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn warning_with_location() {
        let mut emitter = TerminalEmitter::new(Vec::new(), DiagnosticConfig::default());
        emitter.emit(duplicate());
        assert_eq!(emitter.warning_count(), 1);
        assert_eq!(
            output(emitter),
            "warning[A001]: duplicate record\n  --> student s1, 2026-01-13\n"
        );
    }

    #[test]
    fn info_hidden_unless_requested() {
        let mut emitter = TerminalEmitter::new(Vec::new(), DiagnosticConfig::default());
        emitter.emit(weekend());
        assert_eq!(emitter.suppressed(), 1);
        assert_eq!(output(emitter), "");

        let config = DiagnosticConfig {
            show_info: true,
            ..Default::default()
        };
        let mut emitter = TerminalEmitter::new(Vec::new(), config);
        emitter.emit(weekend());
        assert_eq!(output(emitter), "info[A003]: record on a weekend\n  --> student s1\n");
    }

    #[test]
    fn quiet_still_counts() {
        let config = DiagnosticConfig {
            quiet: true,
            ..Default::default()
        };
        let mut emitter = TerminalEmitter::new(Vec::new(), config);
        emitter.emit(duplicate());
        assert_eq!(emitter.warning_count(), 1);
        assert_eq!(output(emitter), "");
    }
}
