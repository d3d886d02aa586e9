//! Plain-text preview of a grid
//!
//! Used by the CLI `--preview` flag and by tests. Cells covered by
//! a merge print empty; holiday and weekend columns can optionally be
//! shown with a marker.

use std::fmt::Write;

use rekap_core::{DayMark, RenderError};

use crate::grid::ReportGrid;
use crate::GridRenderer;

/// Column-aligned text renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    pub separator: String,
    /// Show `*` for holidays and `.` for weekends on empty marked cells
    pub show_marks: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            separator: " | ".into(),
            show_marks: false,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_marks(mut self) -> Self {
        self.show_marks = true;
        self
    }

    fn cell_text(&self, grid: &ReportGrid, row: usize, col: usize) -> String {
        let (r, c) = (row as u32, col as u16);
        if grid.is_covered(r, c) {
            return String::new();
        }
        let Some(cell) = grid.cell(r, c) else {
            return String::new();
        };
        if self.show_marks && cell.value.is_empty() {
            return match cell.mark {
                Some(DayMark::Holiday) => "*".into(),
                Some(DayMark::Weekend) => ".".into(),
                None => String::new(),
            };
        }
        cell.value.to_string()
    }
}

impl GridRenderer for TextRenderer {
    type Output = String;

    fn render(&self, grid: &ReportGrid) -> Result<String, RenderError> {
        grid.validate()?;

        let texts: Vec<Vec<String>> = grid
            .rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                (0..cells.len())
                    .map(|col| self.cell_text(grid, row, col))
                    .collect()
            })
            .collect();

        let mut widths = vec![0usize; grid.width()];
        for row in &texts {
            for (col, text) in row.iter().enumerate() {
                widths[col] = widths[col].max(text.chars().count());
            }
        }

        let blank_separator = " ".repeat(self.separator.chars().count());
        let mut out = String::new();
        for (row, cells) in texts.iter().enumerate() {
            let mut line = String::new();
            for (col, text) in cells.iter().enumerate() {
                if col > 0 {
                    // No column rule inside a merged span
                    if grid.is_covered(row as u32, col as u16) {
                        line.push_str(&blank_separator);
                    } else {
                        line.push_str(&self.separator);
                    }
                }
                let _ = write!(line, "{text:<width$}", width = widths[col]);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, CellKind};

    #[test]
    fn aligns_columns() {
        let grid = ReportGrid {
            rows: vec![
                vec![Cell::header("No"), Cell::header("Name")],
                vec![Cell::integer(1), Cell::text("Ana")],
                vec![Cell::integer(10), Cell::blank(CellKind::Data)],
            ],
            ..Default::default()
        };
        let text = TextRenderer::new().render(&grid).unwrap();
        assert_eq!(text, "No | Name\n1  | Ana\n10 |\n");
    }
}
