//! Monthly-Bucketed Summary layout (semester reports)
//!
//! One group of four columns per calendar month touched by the period. The
//! counts in each group are re-tallied from the student's daily log for that
//! month only.
//!
//! ```text
//! |    |         |      |  December 2025  |  January 2026   | ...
//! | No | Roll-ID | Name | H | S | I | A   | H | S | I | A   | ...
//! ```
//!
//! `No`, `Roll-ID` and `Name` are merged across both header rows.

use rekap_core::{AttendanceReport, AttendanceStatus, SchoolCalendar};

use crate::grid::{Cell, CellKind, ColNum, GridBuilder, GridError, MergeSpan, ReportGrid};
use crate::recap::{
    identity_cells, RecapSummaryBlock, IDENTITY_COLUMNS, NAME_WIDTH, NUMBER_WIDTH, ROLL_ID_WIDTH,
};
use crate::{append_title, GridOptions};

/// Sub-columns per month: H, S, I, A
pub const MONTH_GROUP_WIDTH: ColNum = 4;

const COUNT_WIDTH: f64 = 4.0;

/// Build the Monthly-Bucketed Summary grid for a report.
///
/// The trailing recap block is never merged in this layout. Month buckets
/// carry no day marks, so `_calendar` is only taken to share the signature
/// of [`build_daily_matrix`](crate::build_daily_matrix).
pub fn build_monthly_summary(
    report: &AttendanceReport,
    _calendar: &SchoolCalendar,
    options: &GridOptions,
) -> Result<ReportGrid, GridError> {
    let months = report.period.months();
    let width = IDENTITY_COLUMNS + MONTH_GROUP_WIDTH * months.len() as ColNum;

    let mut builder = GridBuilder::new();
    append_title(&mut builder, report, options, width);

    builder.begin_block("months", width);

    // Row A: identity labels (merged down) and month names (merged across)
    let mut month_row: Vec<Cell> = options
        .labels
        .identity()
        .into_iter()
        .map(Cell::header)
        .collect();
    for month in &months {
        month_row.push(Cell::header(month.to_string()));
        month_row.extend(std::iter::repeat(Cell::blank(CellKind::Header)).take(3));
    }
    let top = builder.push_row(month_row);

    // Row B: status codes per month
    let mut code_row = vec![Cell::blank(CellKind::Header); IDENTITY_COLUMNS as usize];
    for _ in &months {
        code_row.extend(AttendanceStatus::TALLIED.iter().map(|s| Cell::header(s.code())));
    }
    builder.push_row(code_row);

    for col in 0..IDENTITY_COLUMNS {
        builder.merge(MergeSpan::vertical(top, col, 2));
    }
    for index in 0..months.len() as ColNum {
        builder.merge(MergeSpan::horizontal(
            top,
            IDENTITY_COLUMNS + index * MONTH_GROUP_WIDTH,
            MONTH_GROUP_WIDTH,
        ));
    }

    for (index, recap) in report.recaps.iter().enumerate() {
        let mut cells: Vec<Cell> = identity_cells(index, recap).into();
        for month in &months {
            let tally = recap.month_tally(*month);
            cells.extend(tally.as_array().into_iter().map(Cell::integer));
        }
        builder.push_row(cells);
    }
    builder.end_block();
    builder.freeze(top + 2, IDENTITY_COLUMNS);

    builder.widen(0, NUMBER_WIDTH);
    builder.widen(1, ROLL_ID_WIDTH);
    builder.widen(2, NAME_WIDTH);
    for col in IDENTITY_COLUMNS..width {
        builder.widen(col, COUNT_WIDTH);
    }

    builder.blank_rows(options.separator_rows);
    RecapSummaryBlock::new(1, &options.labels)?.append(&mut builder, &report.recaps);

    builder.finish()
}
