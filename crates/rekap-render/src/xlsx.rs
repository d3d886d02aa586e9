//! XLSX renderer
//!
//! Writes a [`ReportGrid`] to a single-sheet workbook. Merges are written
//! with `merge_range`; numeric anchors are overwritten afterwards so the
//! merged cell keeps its number type. Holiday and weekend columns get their
//! own fill.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use rekap_core::{DayMark, RenderError};

use crate::grid::{Cell, CellKind, CellValue, ReportGrid};
use crate::GridRenderer;

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Spreadsheet adapter
#[derive(Clone, Debug)]
pub struct XlsxRenderer {
    pub sheet_name: String,
    /// Fill of holiday columns
    pub holiday_color: u32,
    /// Fill of weekend columns
    pub weekend_color: u32,
    pub header_color: u32,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Attendance".into(),
            holiday_color: 0xF4CCCC,
            weekend_color: 0xE7E6E6,
            header_color: 0xDDEBF7,
        }
    }
}

struct XlsxFormats {
    title: Format,
    header: Format,
    header_holiday: Format,
    header_weekend: Format,
    data: Format,
    data_holiday: Format,
    data_weekend: Format,
    name: Format,
    percent: Format,
}

impl XlsxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worksheet tab name (Excel limits it to 31 characters)
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn holiday_color(mut self, rgb: u32) -> Self {
        self.holiday_color = rgb;
        self
    }

    pub fn weekend_color(mut self, rgb: u32) -> Self {
        self.weekend_color = rgb;
        self
    }

    pub fn header_color(mut self, rgb: u32) -> Self {
        self.header_color = rgb;
        self
    }

    fn create_formats(&self) -> XlsxFormats {
        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        let header = centered
            .clone()
            .set_bold()
            .set_text_wrap()
            .set_background_color(self.header_color);

        let data = centered.clone();

        XlsxFormats {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center),
            header_holiday: header.clone().set_background_color(self.holiday_color),
            header_weekend: header.clone().set_background_color(self.weekend_color),
            header,
            data_holiday: data.clone().set_background_color(self.holiday_color),
            data_weekend: data.clone().set_background_color(self.weekend_color),
            percent: data.clone().set_num_format("0%"),
            name: Format::new().set_border(FormatBorder::Thin),
            data,
        }
    }

    fn format_for<'f>(&self, formats: &'f XlsxFormats, col: u16, cell: &Cell) -> &'f Format {
        match (cell.kind, cell.mark) {
            (CellKind::Title, _) => &formats.title,
            (CellKind::Header, Some(DayMark::Holiday)) => &formats.header_holiday,
            (CellKind::Header, Some(DayMark::Weekend)) => &formats.header_weekend,
            (CellKind::Header, None) => &formats.header,
            (_, Some(DayMark::Holiday)) => &formats.data_holiday,
            (_, Some(DayMark::Weekend)) => &formats.data_weekend,
            _ if matches!(cell.value, CellValue::Percent(_)) => &formats.percent,
            // Names read better left aligned
            _ if col == 2 => &formats.name,
            _ => &formats.data,
        }
    }

    fn write_cell(
        sheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
        format: &Format,
    ) -> Result<(), XlsxError> {
        match value {
            CellValue::Empty => sheet.write_blank(row, col, format)?,
            CellValue::Text(s) => sheet.write_string_with_format(row, col, s, format)?,
            CellValue::Integer(n) => sheet.write_number_with_format(row, col, *n as f64, format)?,
            CellValue::Percent(p) => {
                sheet.write_number_with_format(row, col, f64::from(*p) / 100.0, format)?
            }
        };
        Ok(())
    }

    fn write_sheet(
        &self,
        sheet: &mut Worksheet,
        grid: &ReportGrid,
        formats: &XlsxFormats,
    ) -> Result<(), XlsxError> {
        sheet.set_name(&self.sheet_name)?;

        for merge in &grid.merges {
            let Some(anchor) = grid.cell(merge.row, merge.col) else {
                continue;
            };
            let format = self.format_for(formats, merge.col, anchor);
            let text = match &anchor.value {
                CellValue::Text(s) => s.as_str(),
                _ => "",
            };
            sheet.merge_range(
                merge.row,
                merge.col,
                merge.last_row(),
                merge.last_col(),
                text,
                format,
            )?;
            if matches!(anchor.value, CellValue::Integer(_) | CellValue::Percent(_)) {
                Self::write_cell(sheet, merge.row, merge.col, &anchor.value, format)?;
            }
        }

        for (row, cells) in grid.rows.iter().enumerate() {
            let row = row as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                if grid.is_covered(row, col) {
                    continue;
                }
                // Title rows stay borderless outside the merged text
                if cell.kind == CellKind::Title && cell.value.is_empty() {
                    continue;
                }
                let format = self.format_for(formats, col, cell);
                Self::write_cell(sheet, row, col, &cell.value, format)?;
            }
        }

        for (col, width) in grid.column_widths.iter().enumerate() {
            if *width > 0.0 {
                sheet.set_column_width(col as u16, *width)?;
            }
        }

        if let Some((row, col)) = grid.freeze {
            sheet.set_freeze_panes(row, col)?;
        }
        Ok(())
    }
}

impl GridRenderer for XlsxRenderer {
    type Output = Vec<u8>;

    fn render(&self, grid: &ReportGrid) -> Result<Vec<u8>, RenderError> {
        grid.validate()?;

        let mut workbook = Workbook::new();
        let formats = self.create_formats();
        let sheet = workbook.add_worksheet();
        self.write_sheet(sheet, grid, &formats).map_err(format_error)?;

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }
}

/// `<kind>_<cohort>_<period>.xlsx` with anything outside `[A-Za-z0-9_-]`
/// replaced by `_`. An empty cohort is left out.
pub fn report_file_name(kind: &str, cohort: &str, period_label: &str) -> String {
    let parts: Vec<String> = [kind, cohort, period_label]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(sanitize)
        .collect();
    format!("{}.xlsx", parts.join("_"))
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_names() {
        assert_eq!(
            report_file_name("monthly_attendance", "7A", "2026-01"),
            "monthly_attendance_7A_2026-01.xlsx"
        );
        assert_eq!(
            report_file_name("semester_attendance", "Class 7/B", "2025-2026_sem2"),
            "semester_attendance_Class_7_B_2025-2026_sem2.xlsx"
        );
        assert_eq!(
            report_file_name("monthly_attendance", "", "2026-01"),
            "monthly_attendance_2026-01.xlsx"
        );
    }

    #[test]
    fn empty_grid_still_renders() {
        let bytes = XlsxRenderer::new().render(&ReportGrid::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn format_selection_by_mark() {
        let renderer = XlsxRenderer::new();
        let formats = renderer.create_formats();
        let holiday = Cell::blank(CellKind::Data).marked(Some(DayMark::Holiday));
        let weekend = Cell::blank(CellKind::Header).marked(Some(DayMark::Weekend));
        assert_eq!(renderer.format_for(&formats, 5, &holiday), &formats.data_holiday);
        assert_eq!(renderer.format_for(&formats, 5, &weekend), &formats.header_weekend);
        assert_eq!(renderer.format_for(&formats, 9, &Cell::percent(50)), &formats.percent);
    }
}
