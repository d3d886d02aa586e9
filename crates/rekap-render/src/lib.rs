//! # rekap-render
//!
//! Turns an [`AttendanceReport`] into a [`ReportGrid`]: a two-dimensional
//! array of cells with merge spans, logical blocks and presentation hints.
//! The grid knows nothing about spreadsheets; adapters implementing
//! [`GridRenderer`] turn it into bytes.
//!
//! This crate provides:
//! - Daily Matrix layout (one column per calendar day, for month reports)
//! - Monthly-Bucketed Summary layout (H/S/I/A per month, for semester reports)
//! - The Recap Summary block shared by both
//! - XLSX output via `rust_xlsxwriter`
//! - A plain-text preview renderer
//!
//! ## Example
//!
//! ```rust,ignore
//! use rekap_aggregate::aggregate;
//! use rekap_core::{PeriodSelector, SchoolCalendar};
//! use rekap_render::{GridRenderer, Layout, ReportGridBuilder, XlsxRenderer};
//!
//! let calendar = SchoolCalendar::default();
//! let selector = PeriodSelector::month(0, 2026);
//! let period = calendar.resolve(selector)?;
//! let report = aggregate(&roster, &records, &period, &calendar);
//!
//! let grid = ReportGridBuilder::new().build(&report, &calendar, Layout::for_selector(&selector))?;
//! let xlsx = XlsxRenderer::new().render(&grid)?;
//! std::fs::write("monthly_attendance_7A_2026-01.xlsx", xlsx)?;
//! ```

pub mod daily;
pub mod grid;
pub mod monthly;
pub mod recap;
pub mod text;
pub mod xlsx;

pub use daily::build_daily_matrix;
pub use grid::{
    Cell, CellKind, CellValue, ColNum, GridBlock, GridError, MergeSpan, ReportGrid, RowNum,
    MAX_COLUMNS,
};
pub use monthly::build_monthly_summary;
pub use recap::{GridLabels, RecapSummaryBlock, MAX_RECAP_GROUP_WIDTH};
pub use text::TextRenderer;
pub use xlsx::{report_file_name, XlsxRenderer};

use rekap_core::{AttendanceReport, PeriodSelector, PeriodSpec, RenderError, SchoolCalendar};
use serde::{Deserialize, Serialize};

use grid::GridBuilder;

/// Adapter from a validated grid to an output artifact
pub trait GridRenderer {
    type Output;

    fn render(&self, grid: &ReportGrid) -> Result<Self::Output, RenderError>;
}

impl From<GridError> for RenderError {
    fn from(err: GridError) -> Self {
        RenderError::InvalidGrid(err.to_string())
    }
}

// ============================================================================
// Options
// ============================================================================

/// Presentation options shared by both layouts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Physical columns per recap statistic in the Daily Matrix
    pub recap_group_width: ColNum,
    /// Blank rows between the main table and the recap block
    pub separator_rows: usize,
    /// Optional title row above the main table
    pub title: Option<String>,
    /// Line under the title; defaults to the period label
    pub subtitle: Option<String>,
    pub labels: GridLabels,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            recap_group_width: 2,
            separator_rows: 1,
            title: None,
            subtitle: None,
            labels: GridLabels::default(),
        }
    }
}

/// Which table goes above the recap block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    DailyMatrix,
    MonthlySummary,
}

impl Layout {
    /// Daily Matrix for months, Monthly Summary for semesters
    pub fn for_selector(selector: &PeriodSelector) -> Self {
        if selector.is_month() {
            Layout::DailyMatrix
        } else {
            Layout::MonthlySummary
        }
    }

    /// Report kind used in output file names
    pub fn report_kind(&self) -> &'static str {
        match self {
            Layout::DailyMatrix => "monthly_attendance",
            Layout::MonthlySummary => "semester_attendance",
        }
    }
}

// ============================================================================
// Facade
// ============================================================================

/// Builds report grids with a fixed set of options
#[derive(Clone, Debug, Default)]
pub struct ReportGridBuilder {
    pub options: GridOptions,
}

impl ReportGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GridOptions) -> Self {
        Self { options }
    }

    pub fn recap_group_width(mut self, width: ColNum) -> Self {
        self.options.recap_group_width = width;
        self
    }

    pub fn separator_rows(mut self, rows: usize) -> Self {
        self.options.separator_rows = rows;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn labels(mut self, labels: GridLabels) -> Self {
        self.options.labels = labels;
        self
    }

    pub fn daily_matrix(
        &self,
        report: &AttendanceReport,
        calendar: &SchoolCalendar,
    ) -> Result<ReportGrid, GridError> {
        build_daily_matrix(report, calendar, &self.options)
    }

    pub fn monthly_summary(
        &self,
        report: &AttendanceReport,
        calendar: &SchoolCalendar,
    ) -> Result<ReportGrid, GridError> {
        build_monthly_summary(report, calendar, &self.options)
    }

    pub fn build(
        &self,
        report: &AttendanceReport,
        calendar: &SchoolCalendar,
        layout: Layout,
    ) -> Result<ReportGrid, GridError> {
        match layout {
            Layout::DailyMatrix => self.daily_matrix(report, calendar),
            Layout::MonthlySummary => self.monthly_summary(report, calendar),
        }
    }
}

/// Human label of a period: `"January 2026"` inside one month,
/// otherwise `"2025-07-14 to 2025-12-24"`
pub fn period_label(period: &PeriodSpec) -> String {
    match period.months().as_slice() {
        [single] => single.to_string(),
        _ => period.to_string(),
    }
}

/// Title block: title row and subtitle row merged across `width`, then one
/// blank row. Does nothing without a title.
pub(crate) fn append_title(
    builder: &mut GridBuilder,
    report: &AttendanceReport,
    options: &GridOptions,
    width: ColNum,
) {
    let Some(title) = options.title.as_deref() else {
        return;
    };
    let subtitle = options
        .subtitle
        .clone()
        .unwrap_or_else(|| period_label(&report.period));

    builder.begin_block("title", width);
    for text in [title.to_string(), subtitle] {
        let mut cells = vec![Cell::title(text)];
        cells.extend(std::iter::repeat(Cell::blank(CellKind::Title)).take(width as usize - 1));
        let row = builder.push_row(cells);
        if width > 1 {
            builder.merge(MergeSpan::horizontal(row, 0, width));
        }
    }
    builder.blank_rows(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn layout_follows_selector() {
        assert_eq!(
            Layout::for_selector(&PeriodSelector::month(3, 2026)),
            Layout::DailyMatrix
        );
        assert_eq!(
            Layout::for_selector(&PeriodSelector::semester(1, 2025)),
            Layout::MonthlySummary
        );
        assert_eq!(Layout::MonthlySummary.report_kind(), "semester_attendance");
    }

    #[test]
    fn period_labels() {
        let january = PeriodSpec::new(date(2026, 1, 12), date(2026, 1, 31)).unwrap();
        assert_eq!(period_label(&january), "January 2026");

        let semester = PeriodSpec::new(date(2025, 7, 14), date(2025, 12, 24)).unwrap();
        assert_eq!(period_label(&semester), "2025-07-14 to 2025-12-24");
    }

    #[test]
    fn grid_error_becomes_render_error() {
        let err: RenderError = GridError::MergeOverlap {
            first: MergeSpan::horizontal(0, 0, 2),
            second: MergeSpan::horizontal(0, 1, 2),
        }
        .into();
        assert!(matches!(err, RenderError::InvalidGrid(_)));
    }

    #[test]
    fn builder_options() {
        let builder = ReportGridBuilder::new()
            .recap_group_width(3)
            .separator_rows(2)
            .title("Class 7A");
        assert_eq!(builder.options.recap_group_width, 3);
        assert_eq!(builder.options.separator_rows, 2);
        assert_eq!(builder.options.title.as_deref(), Some("Class 7A"));
    }
}
