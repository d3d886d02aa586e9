//! Daily Matrix layout (month reports)
//!
//! One column per calendar day of the period, including weekends and
//! holidays so the sheet reads as a continuous calendar. Non-instructional
//! columns carry a [`DayMark`](rekap_core::DayMark) on the header and on
//! every data cell below it.
//!
//! ```text
//! | No | Roll-ID | Name | 12 | 13 | 14 | ... | 31 |
//! | 1  | 01      | Ana  | H  | S  |    | ... |    |
//!
//! | No | Roll-ID | Name | Present | Sick | ... | Percentage |   (recap block)
//! ```

use chrono::Datelike;
use rekap_core::{AttendanceReport, SchoolCalendar};

use crate::grid::{Cell, CellKind, CellValue, ColNum, GridBuilder, GridError, ReportGrid};
use crate::recap::{
    identity_cells, RecapSummaryBlock, IDENTITY_COLUMNS, NAME_WIDTH, NUMBER_WIDTH, ROLL_ID_WIDTH,
};
use crate::{append_title, GridOptions};

const DAY_WIDTH: f64 = 4.0;

/// Build the Daily Matrix grid for a report
pub fn build_daily_matrix(
    report: &AttendanceReport,
    calendar: &SchoolCalendar,
    options: &GridOptions,
) -> Result<ReportGrid, GridError> {
    let days = report.period.days();
    let width = IDENTITY_COLUMNS + days.len() as ColNum;
    let marks: Vec<_> = days.iter().map(|d| calendar.day_mark(*d)).collect();

    let mut builder = GridBuilder::new();
    append_title(&mut builder, report, options, width);

    builder.begin_block("matrix", width);
    let mut header: Vec<Cell> = options
        .labels
        .identity()
        .into_iter()
        .map(Cell::header)
        .collect();
    header.extend(days.iter().zip(&marks).map(|(day, mark)| {
        Cell::new(CellValue::Integer(i64::from(day.day())), CellKind::Header).marked(*mark)
    }));
    let header_row = builder.push_row(header);

    for (index, recap) in report.recaps.iter().enumerate() {
        let mut cells: Vec<Cell> = identity_cells(index, recap).into();
        cells.extend(days.iter().zip(&marks).map(|(day, mark)| {
            let value = recap
                .status_on(*day)
                .map(|status| CellValue::Text(status.code().to_string()))
                .unwrap_or(CellValue::Empty);
            Cell::new(value, CellKind::Data).marked(*mark)
        }));
        builder.push_row(cells);
    }
    builder.end_block();
    builder.freeze(header_row + 1, IDENTITY_COLUMNS);

    builder.widen(0, NUMBER_WIDTH);
    builder.widen(1, ROLL_ID_WIDTH);
    builder.widen(2, NAME_WIDTH);
    for col in IDENTITY_COLUMNS..width {
        builder.widen(col, DAY_WIDTH);
    }

    builder.blank_rows(options.separator_rows);
    RecapSummaryBlock::new(options.recap_group_width, &options.labels)?
        .append(&mut builder, &report.recaps);

    builder.finish()
}
