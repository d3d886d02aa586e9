//! Recap Summary block
//!
//! Both report layouts end with the same per-student statistics table:
//!
//! ```text
//! | No | Roll-ID | Name | Present | Sick | Excused | Unexcused | Instructional Days | Percentage |
//! ```
//!
//! Each of the six statistic columns spans `group_width` physical columns.
//! With a group width above one, the span is merged on every row so the
//! statistics line up under a wider matrix; the width is purely visual and
//! independent of the table above it.

use rekap_core::StudentRecap;
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, CellKind, ColNum, GridBuilder, GridError, MergeSpan, RowNum, MAX_COLUMNS};

/// Identity columns shared by every table: No, Roll-ID, Name
pub(crate) const IDENTITY_COLUMNS: ColNum = 3;

/// Statistic columns of the recap block
pub(crate) const STAT_COLUMNS: ColNum = 6;

/// Widest statistic group whose block still fits a worksheet row
pub const MAX_RECAP_GROUP_WIDTH: ColNum = (MAX_COLUMNS - IDENTITY_COLUMNS) / STAT_COLUMNS;

pub(crate) const NUMBER_WIDTH: f64 = 4.0;
pub(crate) const ROLL_ID_WIDTH: f64 = 10.0;
pub(crate) const NAME_WIDTH: f64 = 28.0;

/// Column labels used by the layouts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLabels {
    pub number: String,
    pub roll_id: String,
    pub name: String,
    pub present: String,
    pub sick: String,
    pub excused: String,
    pub unexcused: String,
    pub instructional_days: String,
    pub percentage: String,
}

impl Default for GridLabels {
    fn default() -> Self {
        Self {
            number: "No".into(),
            roll_id: "Roll-ID".into(),
            name: "Name".into(),
            present: "Present".into(),
            sick: "Sick".into(),
            excused: "Excused".into(),
            unexcused: "Unexcused".into(),
            instructional_days: "Instructional Days".into(),
            percentage: "Percentage".into(),
        }
    }
}

impl GridLabels {
    pub(crate) fn identity(&self) -> [&str; 3] {
        [&self.number, &self.roll_id, &self.name]
    }

    pub(crate) fn statistics(&self) -> [&str; 6] {
        [
            &self.present,
            &self.sick,
            &self.excused,
            &self.unexcused,
            &self.instructional_days,
            &self.percentage,
        ]
    }
}

/// Identity cells of one student row
pub(crate) fn identity_cells(index: usize, recap: &StudentRecap) -> [Cell; 3] {
    [
        Cell::integer(index as i64 + 1),
        Cell::text(recap.student.roll_id.as_str()),
        Cell::text(recap.student.name.as_str()),
    ]
}

/// Statistics table appended under either layout
#[derive(Clone, Debug)]
pub struct RecapSummaryBlock<'a> {
    group_width: ColNum,
    labels: &'a GridLabels,
}

impl<'a> RecapSummaryBlock<'a> {
    /// `group_width` below one is treated as one; above
    /// [`MAX_RECAP_GROUP_WIDTH`] it is an error.
    pub fn new(group_width: ColNum, labels: &'a GridLabels) -> Result<Self, GridError> {
        if group_width > MAX_RECAP_GROUP_WIDTH {
            return Err(GridError::GroupWidthTooLarge {
                width: group_width,
                max: MAX_RECAP_GROUP_WIDTH,
            });
        }
        Ok(Self {
            group_width: group_width.max(1),
            labels,
        })
    }

    pub fn group_width(&self) -> ColNum {
        self.group_width
    }

    /// Declared width of the block
    pub fn width(&self) -> ColNum {
        IDENTITY_COLUMNS + STAT_COLUMNS * self.group_width
    }

    /// First physical column of statistic `index` (0-based)
    pub fn stat_column(&self, index: ColNum) -> ColNum {
        IDENTITY_COLUMNS + index * self.group_width
    }

    /// Append header and one row per recap as block `"recap"`
    pub(crate) fn append(&self, builder: &mut GridBuilder, recaps: &[StudentRecap]) {
        builder.begin_block("recap", self.width());

        let mut header: Vec<Cell> = self
            .labels
            .identity()
            .into_iter()
            .map(Cell::header)
            .collect();
        for label in self.labels.statistics() {
            header.push(Cell::header(label));
            header.extend(self.padding(CellKind::Header));
        }
        let row = builder.push_row(header);
        self.merge_groups(builder, row);

        for (index, recap) in recaps.iter().enumerate() {
            let mut cells: Vec<Cell> = identity_cells(index, recap).into();
            let values = [
                Cell::integer(recap.present_count()),
                Cell::integer(recap.sick_count()),
                Cell::integer(recap.excused_count()),
                Cell::integer(recap.unexcused_count()),
                Cell::integer(recap.instructional_days as i64),
                Cell::percent(recap.attendance_percentage),
            ];
            for value in values {
                cells.push(value);
                cells.extend(self.padding(CellKind::Data));
            }
            let row = builder.push_row(cells);
            self.merge_groups(builder, row);
        }

        builder.widen(0, NUMBER_WIDTH);
        builder.widen(1, ROLL_ID_WIDTH);
        builder.widen(2, NAME_WIDTH);
        // Spread the statistic width over its group
        let per_column = (11.0 / f64::from(self.group_width)).max(4.0);
        for col in IDENTITY_COLUMNS..self.width() {
            builder.widen(col, per_column);
        }
        builder.end_block();
    }

    /// Cells under a merged group, after its anchor
    fn padding(&self, kind: CellKind) -> impl Iterator<Item = Cell> {
        std::iter::repeat(Cell::blank(kind)).take(self.group_width as usize - 1)
    }

    fn merge_groups(&self, builder: &mut GridBuilder, row: RowNum) {
        if self.group_width < 2 {
            return;
        }
        for index in 0..STAT_COLUMNS {
            builder.merge(MergeSpan::horizontal(row, self.stat_column(index), self.group_width));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rekap_core::{AttendanceStatus, Student};
    use std::collections::BTreeMap;

    use crate::grid::CellValue;

    fn recaps() -> Vec<StudentRecap> {
        let mut log = BTreeMap::new();
        log.insert(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(), AttendanceStatus::Present);
        log.insert(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(), AttendanceStatus::Sick);
        vec![
            StudentRecap::new(Student::new("s1", "01", "Ana"), 4, log),
            StudentRecap::new(Student::new("s2", "02", "Budi"), 4, BTreeMap::new()),
        ]
    }

    #[test]
    fn width_follows_group_width() {
        let labels = GridLabels::default();
        assert_eq!(RecapSummaryBlock::new(1, &labels).unwrap().width(), 9);
        assert_eq!(RecapSummaryBlock::new(2, &labels).unwrap().width(), 15);
        assert_eq!(RecapSummaryBlock::new(3, &labels).unwrap().width(), 21);
        assert_eq!(RecapSummaryBlock::new(0, &labels).unwrap().group_width(), 1);
    }

    #[test]
    fn group_width_limited_to_worksheet_columns() {
        let labels = GridLabels::default();
        let widest = RecapSummaryBlock::new(MAX_RECAP_GROUP_WIDTH, &labels).unwrap();
        assert!(widest.width() <= MAX_COLUMNS);

        let err = RecapSummaryBlock::new(MAX_RECAP_GROUP_WIDTH + 1, &labels).unwrap_err();
        assert_eq!(
            err,
            GridError::GroupWidthTooLarge {
                width: MAX_RECAP_GROUP_WIDTH + 1,
                max: MAX_RECAP_GROUP_WIDTH,
            }
        );
        assert!(RecapSummaryBlock::new(ColNum::MAX, &labels).is_err());
    }

    #[test]
    fn merged_block_with_group_width_two() {
        let labels = GridLabels::default();
        let block = RecapSummaryBlock::new(2, &labels).unwrap();
        let mut builder = GridBuilder::new();
        block.append(&mut builder, &recaps());
        let grid = builder.finish().unwrap();

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 15);
        // 6 merges on the header plus 6 per student
        assert_eq!(grid.merges.len(), 18);
        assert_eq!(grid.merge_at(0, 3), Some(&MergeSpan::horizontal(0, 3, 2)));
        assert_eq!(grid.merge_at(0, 13), Some(&MergeSpan::horizontal(0, 13, 2)));

        let first = grid.row(1).unwrap();
        assert_eq!(first[0].value, CellValue::Integer(1));
        assert_eq!(first[2].value, CellValue::Text("Ana".into()));
        assert_eq!(first[3].value, CellValue::Integer(1)); // present
        assert_eq!(first[4].value, CellValue::Empty);
        assert_eq!(first[5].value, CellValue::Integer(1)); // sick
        assert_eq!(first[11].value, CellValue::Integer(4)); // instructional days
        assert_eq!(first[13].value, CellValue::Percent(25));
    }

    #[test]
    fn unmerged_block_with_group_width_one() {
        let labels = GridLabels::default();
        let block = RecapSummaryBlock::new(1, &labels).unwrap();
        let mut builder = GridBuilder::new();
        block.append(&mut builder, &recaps());
        let grid = builder.finish().unwrap();

        assert!(grid.merges.is_empty());
        let header: Vec<String> = grid
            .row(0)
            .unwrap()
            .iter()
            .map(|c| c.value.to_string())
            .collect();
        assert_eq!(
            header,
            vec![
                "No",
                "Roll-ID",
                "Name",
                "Present",
                "Sick",
                "Excused",
                "Unexcused",
                "Instructional Days",
                "Percentage"
            ]
        );
        assert_eq!(grid.row(2).unwrap()[8].value, CellValue::Percent(0));
    }

    #[test]
    fn empty_roster_gives_header_only() {
        let labels = GridLabels::default();
        let mut builder = GridBuilder::new();
        RecapSummaryBlock::new(2, &labels).unwrap().append(&mut builder, &[]);
        let grid = builder.finish().unwrap();
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.merges.len(), 6);
    }
}
