//! Structural report grid
//!
//! A [`ReportGrid`] is a format-independent description of a report sheet:
//! rows of tagged cells, merged spans and column width hints. Layout builders
//! produce it, renderers consume it.
//!
//! The grid is divided into named [`GridBlock`]s (title, matrix, recap). Each
//! block declares its width; every row inside a block has exactly that many
//! cells and every merge must stay inside the block of its anchor row.
//! [`ReportGrid::validate`] checks this before a grid leaves a builder.

use rekap_core::DayMark;
use serde::Serialize;
use thiserror::Error;

/// Row index, matching spreadsheet row numbering from 0
pub type RowNum = u32;
/// Column index, matching spreadsheet column numbering from 0
pub type ColNum = u16;

/// Columns in a worksheet row (`A` to `XFD`)
pub const MAX_COLUMNS: ColNum = 16_384;

// ============================================================================
// Cells
// ============================================================================

/// Cell content
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    /// Whole percentage, 0-100
    Percent(u8),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Semantic role of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Title,
    Header,
    Data,
    Separator,
}

/// One grid cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub kind: CellKind,
    /// Set on every cell of a non-instructional date column
    pub mark: Option<DayMark>,
}

impl Cell {
    pub fn new(value: CellValue, kind: CellKind) -> Self {
        Self {
            value,
            kind,
            mark: None,
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(CellValue::Text(text.into()), CellKind::Title)
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self::new(CellValue::Text(text.into()), CellKind::Header)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(CellValue::Text(text.into()), CellKind::Data)
    }

    pub fn integer(n: impl Into<i64>) -> Self {
        Self::new(CellValue::Integer(n.into()), CellKind::Data)
    }

    pub fn percent(p: u8) -> Self {
        Self::new(CellValue::Percent(p), CellKind::Data)
    }

    /// Empty cell of the given kind (also used under merged spans)
    pub fn blank(kind: CellKind) -> Self {
        Self::new(CellValue::Empty, kind)
    }

    pub fn marked(mut self, mark: Option<DayMark>) -> Self {
        self.mark = mark;
        self
    }
}

// ============================================================================
// Merges and blocks
// ============================================================================

/// Rectangular region rendered as one cell; the anchor is the top-left cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MergeSpan {
    pub row: RowNum,
    pub col: ColNum,
    pub row_span: RowNum,
    pub col_span: ColNum,
}

impl MergeSpan {
    pub fn new(row: RowNum, col: ColNum, row_span: RowNum, col_span: ColNum) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// Horizontal merge within one row
    pub fn horizontal(row: RowNum, col: ColNum, col_span: ColNum) -> Self {
        Self::new(row, col, 1, col_span)
    }

    /// Vertical merge within one column
    pub fn vertical(row: RowNum, col: ColNum, row_span: RowNum) -> Self {
        Self::new(row, col, row_span, 1)
    }

    pub fn last_row(&self) -> RowNum {
        self.row + self.row_span.saturating_sub(1)
    }

    pub fn last_col(&self) -> ColNum {
        self.col + self.col_span.saturating_sub(1)
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.row_span) * u64::from(self.col_span)
    }

    pub fn contains(&self, row: RowNum, col: ColNum) -> bool {
        row >= self.row && row <= self.last_row() && col >= self.col && col <= self.last_col()
    }

    pub fn overlaps(&self, other: &MergeSpan) -> bool {
        self.row <= other.last_row()
            && other.row <= self.last_row()
            && self.col <= other.last_col()
            && other.col <= self.last_col()
    }
}

/// Declared extent of one table block
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridBlock {
    pub name: String,
    pub first_row: RowNum,
    pub row_count: RowNum,
    pub width: ColNum,
}

impl GridBlock {
    pub fn contains_row(&self, row: RowNum) -> bool {
        row >= self.first_row && row < self.first_row + self.row_count
    }

    pub fn last_row(&self) -> Option<RowNum> {
        (self.row_count > 0).then(|| self.first_row + self.row_count - 1)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Structural defect in a built grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("merge at ({row}, {col}) covers fewer than two cells")]
    DegenerateMerge { row: RowNum, col: ColNum },

    #[error("merge at ({row}, {col}) is not inside any block")]
    MergeOutsideBlock { row: RowNum, col: ColNum },

    #[error("merge at ({row}, {col}) ends at column {last_col}, block '{block}' is {width} columns wide")]
    MergeExceedsWidth {
        block: String,
        row: RowNum,
        col: ColNum,
        last_col: ColNum,
        width: ColNum,
    },

    #[error("merge at ({row}, {col}) ends at row {last_row}, past the end of block '{block}'")]
    MergeExceedsRows {
        block: String,
        row: RowNum,
        col: ColNum,
        last_row: RowNum,
    },

    #[error("merges at ({}, {}) and ({}, {}) overlap", .first.row, .first.col, .second.row, .second.col)]
    MergeOverlap { first: MergeSpan, second: MergeSpan },

    #[error("row {row} of block '{block}' has {found} cells, expected {expected}")]
    RowWidthMismatch {
        block: String,
        row: RowNum,
        expected: ColNum,
        found: usize,
    },

    #[error("block '{block}' extends past the last grid row")]
    BlockOutOfGrid { block: String },

    #[error("recap group width {width} is out of range: expected 1..={max}")]
    GroupWidthTooLarge { width: ColNum, max: ColNum },
}

// ============================================================================
// ReportGrid
// ============================================================================

/// Built report sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportGrid {
    pub rows: Vec<Vec<Cell>>,
    pub merges: Vec<MergeSpan>,
    pub blocks: Vec<GridBlock>,
    /// Width hint per column, in spreadsheet character units
    pub column_widths: Vec<f64>,
    /// First unfrozen (row, column), if panes should be frozen
    pub freeze: Option<(RowNum, ColNum)>,
}

impl ReportGrid {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: RowNum, col: ColNum) -> Option<&Cell> {
        self.rows.get(row as usize)?.get(col as usize)
    }

    pub fn row(&self, row: RowNum) -> Option<&[Cell]> {
        self.rows.get(row as usize).map(Vec::as_slice)
    }

    pub fn block(&self, name: &str) -> Option<&GridBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Merge anchored exactly at (row, col)
    pub fn merge_at(&self, row: RowNum, col: ColNum) -> Option<&MergeSpan> {
        self.merges.iter().find(|m| m.row == row && m.col == col)
    }

    /// Inside a merge but not its anchor
    pub fn is_covered(&self, row: RowNum, col: ColNum) -> bool {
        self.merges
            .iter()
            .any(|m| m.contains(row, col) && !(m.row == row && m.col == col))
    }

    /// Check block and merge invariants
    pub fn validate(&self) -> Result<(), GridError> {
        for block in &self.blocks {
            if let Some(last) = block.last_row() {
                if last as usize >= self.rows.len() {
                    return Err(GridError::BlockOutOfGrid {
                        block: block.name.clone(),
                    });
                }
            }
            for row in block.first_row..block.first_row + block.row_count {
                let found = self.rows[row as usize].len();
                if found != block.width as usize {
                    return Err(GridError::RowWidthMismatch {
                        block: block.name.clone(),
                        row,
                        expected: block.width,
                        found,
                    });
                }
            }
        }

        for merge in &self.merges {
            if merge.cell_count() < 2 {
                return Err(GridError::DegenerateMerge {
                    row: merge.row,
                    col: merge.col,
                });
            }
            let block = self
                .blocks
                .iter()
                .find(|b| b.contains_row(merge.row))
                .ok_or(GridError::MergeOutsideBlock {
                    row: merge.row,
                    col: merge.col,
                })?;
            if merge.last_col() >= block.width {
                return Err(GridError::MergeExceedsWidth {
                    block: block.name.clone(),
                    row: merge.row,
                    col: merge.col,
                    last_col: merge.last_col(),
                    width: block.width,
                });
            }
            if !block.contains_row(merge.last_row()) {
                return Err(GridError::MergeExceedsRows {
                    block: block.name.clone(),
                    row: merge.row,
                    col: merge.col,
                    last_row: merge.last_row(),
                });
            }
        }

        for (i, first) in self.merges.iter().enumerate() {
            if let Some(second) = self.merges[i + 1..].iter().find(|m| m.overlaps(first)) {
                return Err(GridError::MergeOverlap {
                    first: *first,
                    second: *second,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental grid construction used by the layout builders
#[derive(Debug, Default)]
pub(crate) struct GridBuilder {
    grid: ReportGrid,
    open: Option<GridBlock>,
}

impl GridBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_row(&self) -> RowNum {
        self.grid.rows.len() as RowNum
    }

    /// Start a block; rows pushed until `end_block` belong to it
    pub(crate) fn begin_block(&mut self, name: &str, width: ColNum) {
        self.end_block();
        self.open = Some(GridBlock {
            name: name.to_string(),
            first_row: self.next_row(),
            row_count: 0,
            width,
        });
    }

    pub(crate) fn end_block(&mut self) {
        if let Some(block) = self.open.take() {
            self.grid.blocks.push(block);
        }
    }

    /// Append a row and return its index
    pub(crate) fn push_row(&mut self, cells: Vec<Cell>) -> RowNum {
        let row = self.next_row();
        self.grid.rows.push(cells);
        if let Some(block) = self.open.as_mut() {
            block.row_count += 1;
        }
        row
    }

    /// Empty rows between blocks
    pub(crate) fn blank_rows(&mut self, count: usize) {
        self.end_block();
        for _ in 0..count {
            self.grid.rows.push(Vec::new());
        }
    }

    pub(crate) fn merge(&mut self, span: MergeSpan) {
        self.grid.merges.push(span);
    }

    /// Raise the width hint of a column
    pub(crate) fn widen(&mut self, col: ColNum, width: f64) {
        let col = col as usize;
        if self.grid.column_widths.len() <= col {
            self.grid.column_widths.resize(col + 1, 0.0);
        }
        if self.grid.column_widths[col] < width {
            self.grid.column_widths[col] = width;
        }
    }

    pub(crate) fn freeze(&mut self, row: RowNum, col: ColNum) {
        self.grid.freeze = Some((row, col));
    }

    /// Close the open block and validate the result
    pub(crate) fn finish(mut self) -> Result<ReportGrid, GridError> {
        self.end_block();
        self.grid.validate()?;
        Ok(self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(width: usize) -> Vec<Cell> {
        vec![Cell::blank(CellKind::Data); width]
    }

    fn two_block_builder() -> GridBuilder {
        let mut builder = GridBuilder::new();
        builder.begin_block("matrix", 5);
        builder.push_row(row(5));
        builder.push_row(row(5));
        builder.blank_rows(1);
        builder.begin_block("recap", 3);
        builder.push_row(row(3));
        builder
    }

    #[test]
    fn valid_grid_passes() {
        let mut builder = two_block_builder();
        builder.merge(MergeSpan::horizontal(0, 0, 5));
        builder.merge(MergeSpan::horizontal(3, 1, 2));
        let grid = builder.finish().unwrap();

        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.blocks.len(), 2);
        assert_eq!(grid.block("recap").unwrap().first_row, 3);
        assert!(grid.is_covered(0, 4));
        assert!(!grid.is_covered(0, 0));
    }

    #[test]
    fn merge_wider_than_its_block_is_rejected() {
        let mut builder = two_block_builder();
        // Fits the matrix above but not the recap block
        builder.merge(MergeSpan::horizontal(3, 0, 4));
        let err = builder.finish().unwrap_err();
        assert!(matches!(
            err,
            GridError::MergeExceedsWidth { ref block, width: 3, .. } if block == "recap"
        ));
    }

    #[test]
    fn merge_leaving_its_block_vertically_is_rejected() {
        let mut builder = two_block_builder();
        builder.merge(MergeSpan::vertical(1, 0, 2));
        assert!(matches!(
            builder.finish(),
            Err(GridError::MergeExceedsRows { .. })
        ));
    }

    #[test]
    fn merge_on_separator_row_is_rejected() {
        let mut builder = two_block_builder();
        builder.merge(MergeSpan::horizontal(2, 0, 2));
        assert_eq!(
            builder.finish().unwrap_err(),
            GridError::MergeOutsideBlock { row: 2, col: 0 }
        );
    }

    #[test]
    fn single_cell_merge_is_rejected() {
        let mut builder = two_block_builder();
        builder.merge(MergeSpan::horizontal(0, 0, 1));
        assert_eq!(
            builder.finish().unwrap_err(),
            GridError::DegenerateMerge { row: 0, col: 0 }
        );
    }

    #[test]
    fn overlapping_merges_are_rejected() {
        let mut builder = two_block_builder();
        builder.merge(MergeSpan::horizontal(0, 0, 3));
        builder.merge(MergeSpan::new(0, 2, 2, 2));
        assert!(matches!(
            builder.finish(),
            Err(GridError::MergeOverlap { .. })
        ));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut builder = GridBuilder::new();
        builder.begin_block("matrix", 4);
        builder.push_row(row(4));
        builder.push_row(row(3));
        assert_eq!(
            builder.finish().unwrap_err(),
            GridError::RowWidthMismatch {
                block: "matrix".into(),
                row: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn widen_keeps_maximum() {
        let mut builder = GridBuilder::new();
        builder.widen(2, 10.0);
        builder.widen(2, 4.0);
        builder.widen(0, 5.0);
        let grid = builder.finish().unwrap();
        assert_eq!(grid.column_widths, vec![5.0, 0.0, 10.0]);
    }

    #[test]
    fn cell_value_display() {
        assert_eq!(CellValue::Percent(85).to_string(), "85%");
        assert_eq!(CellValue::Integer(3).to_string(), "3");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
