//! Structural edits: inserting, deleting and clearing rows and columns
//!
//! Every edit validates first and only then touches state, so a failed
//! call leaves the worksheet exactly as it was. A successful insert or
//! delete produces one [`ShiftEvent`] that reaches cells, lines and
//! anchored ranges of that axis.

use super::Worksheet;
use crate::cell::{validate_col, validate_row, CellRange};
use crate::error::{Error, Result};
use crate::line::LineState;
use crate::shift::{Axis, ShiftEvent};

fn axis_range(axis: Axis, first: u32, last: u32) -> Result<CellRange> {
    match axis {
        Axis::Row => CellRange::full_rows(first, last),
        Axis::Column => CellRange::full_columns(first as u16, last as u16),
    }
}

impl Worksheet {
    /// Highest index on `axis` that an insert would move
    fn last_occupied(&self, axis: Axis) -> Option<u32> {
        [
            self.cells.max_index(axis),
            self.lines(axis).max_index(),
            self.anchors.max_extent(axis),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Insert `count` blank lines next to `anchor`; `after` puts them
    /// below/right of it instead of above/left.
    ///
    /// The new lines take the explicit style of the line just before the
    /// insertion point, if it has one.
    pub(crate) fn insert_lines(&mut self, axis: Axis, anchor: u32, count: u32, after: bool) -> Result<()> {
        let anchor = axis.validate(anchor as u64)?;
        if count == 0 {
            return Err(Error::invalid_argument(format!(
                "cannot insert 0 {}s",
                axis.name()
            )));
        }

        let max = axis.max_index() as u64;
        let at = anchor as u64 + u64::from(after);
        let last_new = at + count as u64 - 1;
        if last_new > max {
            return Err(axis.out_of_bounds(last_new));
        }
        if let Some(last) = self.last_occupied(axis) {
            let shifted = last as u64 + count as u64;
            if last as u64 >= at && shifted > max {
                return Err(axis.out_of_bounds(shifted));
            }
        }

        let at = at as u32;
        let inherited = at
            .checked_sub(1)
            .filter(|&prev| prev >= 1)
            .and_then(|prev| self.lines(axis).get(prev))
            .and_then(|line| line.style);

        self.apply_shift(axis, ShiftEvent::Inserted { at, count });

        for index in at..at + count {
            self.lines_mut(axis).insert(index, LineState::default());
            if let Some(id) = inherited {
                self.assign_line_style(axis, index, id);
            }
        }

        log::debug!(
            "inserted {} {}(s) at {} on '{}'",
            count,
            axis.name(),
            at,
            self.name
        );
        Ok(())
    }

    /// Delete the lines `at..at + count`, shifting later lines back
    pub(crate) fn delete_lines(&mut self, axis: Axis, at: u32, count: u32) -> Result<()> {
        let at = axis.validate(at as u64)?;
        if count == 0 {
            return Err(Error::invalid_argument(format!(
                "cannot delete 0 {}s",
                axis.name()
            )));
        }
        let last = at as u64 + count as u64 - 1;
        if last > axis.max_index() as u64 {
            return Err(axis.out_of_bounds(last));
        }
        let last = last as u32;

        let removed = self.cells.remove_range(&axis_range(axis, at, last)?);
        self.lines_mut(axis).remove_span(at, last);
        self.apply_shift(axis, ShiftEvent::Deleted { at, count });

        log::debug!(
            "deleted {} {}(s) at {} on '{}' ({} cells dropped)",
            count,
            axis.name(),
            at,
            self.name,
            removed
        );
        Ok(())
    }

    /// Insert `count` rows above `row`
    pub fn insert_rows_above(&mut self, row: u32, count: u32) -> Result<()> {
        self.insert_lines(Axis::Row, row, count, false)
    }

    /// Insert `count` rows below `row`
    pub fn insert_rows_below(&mut self, row: u32, count: u32) -> Result<()> {
        self.insert_lines(Axis::Row, row, count, true)
    }

    /// Insert `count` columns to the left of `col`
    pub fn insert_columns_before(&mut self, col: u16, count: u32) -> Result<()> {
        self.insert_lines(Axis::Column, col as u32, count, false)
    }

    /// Insert `count` columns to the right of `col`
    pub fn insert_columns_after(&mut self, col: u16, count: u32) -> Result<()> {
        self.insert_lines(Axis::Column, col as u32, count, true)
    }

    /// Delete `count` rows starting at `row`
    pub fn delete_rows(&mut self, row: u32, count: u32) -> Result<()> {
        self.delete_lines(Axis::Row, row, count)
    }

    /// Delete `count` columns starting at `col`
    pub fn delete_columns(&mut self, col: u16, count: u32) -> Result<()> {
        self.delete_lines(Axis::Column, col as u32, count)
    }

    /// Remove content and style overrides inside `range` without shifting.
    ///
    /// Rows (columns) fully covered by the range are reset to the worksheet
    /// style, pushed the same way as any line style so that crossing styled
    /// lines no longer show through. Their size is kept.
    pub fn clear_range(&mut self, range: &CellRange) {
        let removed = self.cells.remove_range(range);

        let sheet_style = self.sheet_style_id();
        for axis in [Axis::Row, Axis::Column] {
            let full = match axis {
                Axis::Row => range.is_full_rows(),
                Axis::Column => range.is_full_columns(),
            };
            if !full {
                continue;
            }
            let (first, last) = range.span_on(axis);
            let covered: Vec<u32> = self
                .lines(axis)
                .iter()
                .map(|(index, _)| index)
                .filter(|index| (first..=last).contains(index))
                .collect();
            for index in covered {
                self.assign_line_style(axis, index, sheet_style);
            }
        }

        log::debug!(
            "cleared {} on '{}' ({} cells dropped)",
            range,
            self.name,
            removed
        );
    }

    /// Clear one whole row
    pub fn clear_row(&mut self, row: u32) -> Result<()> {
        let range = CellRange::full_row(validate_row(row as u64)?)?;
        self.clear_range(&range);
        Ok(())
    }

    /// Clear one whole column
    pub fn clear_column(&mut self, col: u16) -> Result<()> {
        let range = CellRange::full_column(validate_col(col as u64)?)?;
        self.clear_range(&range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::style::{Color, Style};
    use crate::{MAX_COLS, MAX_ROWS};
    use pretty_assertions::assert_eq;

    fn fill(color: Color) -> Style {
        Style::new().fill_color(color)
    }

    #[test]
    fn test_insert_rows_shifts_cells_and_lines() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "top").unwrap();
        ws.set_cell_value("A5", "five").unwrap();
        ws.set_row_height(5, 30.0).unwrap();

        ws.insert_rows_above(5, 3).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_text(), Some("top"));
        assert_eq!(ws.get_value("A8").unwrap().as_text(), Some("five"));
        assert!(ws.cell("A5").unwrap().is_none());
        assert_eq!(ws.row_height(8).unwrap(), 30.0);
        assert_eq!(ws.row_height(5).unwrap(), 15.0);
        // new lines exist for the inserted rows
        assert!(ws.rows().get(5).is_some() && ws.rows().get(7).is_some());
    }

    #[test]
    fn test_insert_below_and_after() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("B2", 1.0).unwrap();
        ws.set_cell_value("B3", 2.0).unwrap();

        ws.insert_rows_below(2, 2).unwrap();
        assert_eq!(ws.get_value("B2").unwrap().as_number(), Some(1.0));
        assert_eq!(ws.get_value("B5").unwrap().as_number(), Some(2.0));

        ws.insert_columns_after(1, 1).unwrap();
        assert_eq!(ws.get_value("C2").unwrap().as_number(), Some(1.0));

        ws.insert_columns_before(1, 1).unwrap();
        assert_eq!(ws.get_value("D5").unwrap().as_number(), Some(2.0));
    }

    #[test]
    fn test_inserted_lines_inherit_previous_style() {
        let mut ws = Worksheet::new("Test");
        let s1 = fill(Color::RED);
        ws.set_row_style(4, s1.clone()).unwrap();
        ws.set_row_style(5, s1.clone()).unwrap();

        ws.insert_rows_below(5, 2).unwrap();
        assert_eq!(ws.row_style(6).unwrap(), &s1);
        assert_eq!(ws.row_style(7).unwrap(), &s1);

        ws.insert_rows_above(1, 1).unwrap();
        assert_eq!(ws.row_style(1).unwrap(), &Style::default());
    }

    #[test]
    fn test_insert_validation_is_all_or_nothing() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value_at(MAX_ROWS - 1, 1, "near the end").unwrap();
        ws.set_cell_value("A1", 1.0).unwrap();
        let before = ws.snapshot();

        let err = ws.insert_rows_above(1, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert_eq!(ws.snapshot(), before);

        assert_eq!(ws.insert_rows_above(1, 0).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(ws.insert_rows_below(MAX_ROWS, 1).is_err());
        assert_eq!(ws.snapshot(), before);
        assert!(ws.journal().is_empty());

        // one more still fits
        ws.insert_rows_above(1, 1).unwrap();
        assert_eq!(ws.get_value_at(MAX_ROWS, 1).as_text(), Some("near the end"));
    }

    #[test]
    fn test_insert_past_occupied_region() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", 1.0).unwrap();
        // nothing at or after the insertion point moves, so only the new rows must fit
        ws.insert_rows_above(MAX_ROWS - 4, 5).unwrap();
        assert_eq!(ws.rows().max_index(), Some(MAX_ROWS));
        assert!(ws.insert_rows_above(MAX_ROWS - 4, 1).is_err());
        assert!(ws.insert_columns_before(MAX_COLS, 2).is_err());
    }

    #[test]
    fn test_delete_rows() {
        let mut ws = Worksheet::new("Test");
        for row in 1..=10 {
            ws.set_cell_value_at(row, 3, row as f64).unwrap();
        }
        ws.set_row_height(4, 40.0).unwrap();
        ws.set_row_height(9, 90.0).unwrap();

        ws.delete_rows(3, 4).unwrap();

        assert_eq!(ws.get_value_at(2, 3).as_number(), Some(2.0));
        assert_eq!(ws.get_value_at(3, 3).as_number(), Some(7.0));
        assert_eq!(ws.get_value_at(6, 3).as_number(), Some(10.0));
        assert_eq!(ws.cell_count(), 6);
        assert_eq!(ws.row_height(5).unwrap(), 90.0);
        assert_eq!(ws.rows().len(), 1);
    }

    #[test]
    fn test_delete_validation() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", 1.0).unwrap();
        let before = ws.snapshot();

        assert_eq!(ws.delete_rows(1, 0).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(ws.delete_rows(0, 1).unwrap_err().kind(), ErrorKind::OutOfBounds);
        assert_eq!(ws.delete_columns(MAX_COLS, 2).unwrap_err().kind(), ErrorKind::OutOfBounds);
        assert_eq!(ws.snapshot(), before);
    }

    #[test]
    fn test_delete_columns_moves_cells_left() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "a").unwrap();
        ws.set_cell_value("C1", "c").unwrap();
        ws.set_cell_value("E1", "e").unwrap();
        ws.set_column_style(5, fill(Color::BLUE)).unwrap();

        ws.delete_columns(2, 2).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_text(), Some("a"));
        assert_eq!(ws.get_value("C1").unwrap().as_text(), Some("e"));
        assert_eq!(ws.column_style(3).unwrap(), &fill(Color::BLUE));
        assert_eq!(ws.cell_count(), 2);
    }

    #[test]
    fn test_clear_range_keeps_positions() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", 1.0).unwrap();
        ws.set_cell_value("B2", 2.0).unwrap();
        ws.set_cell_value("C3", 3.0).unwrap();

        ws.clear_range(&CellRange::parse("A1:B2").unwrap());
        assert_eq!(ws.cell_count(), 1);
        assert_eq!(ws.get_value("C3").unwrap().as_number(), Some(3.0));
        assert!(ws.journal().is_empty());
    }

    #[test]
    fn test_clear_row_resets_style_keeps_height() {
        let mut ws = Worksheet::new("Test");
        let sheet_style = Style::new().italic(true);
        ws.set_style(sheet_style.clone());
        ws.set_row_style(2, fill(Color::RED)).unwrap();
        ws.set_row_height(2, 22.0).unwrap();
        ws.set_cell_value("D2", "x").unwrap();

        ws.clear_row(2).unwrap();

        assert_eq!(ws.row_style(2).unwrap(), &sheet_style);
        assert_eq!(ws.row_height(2).unwrap(), 22.0);
        assert!(ws.cell("D2").unwrap().is_none());
    }

    #[test]
    fn test_clear_row_under_styled_column() {
        let mut ws = Worksheet::new("Test");
        ws.set_column_style(4, fill(Color::BLUE)).unwrap();
        let mut row = ws.row(2).unwrap();
        row.set_style(&mut ws, fill(Color::RED)).unwrap();
        assert_eq!(ws.cell_style("D2").unwrap(), &fill(Color::RED));

        row.clear(&mut ws).unwrap();

        assert_eq!(ws.cell_style("D2").unwrap(), ws.style());
        assert_eq!(ws.cell_style("A2").unwrap(), ws.style());
        assert_eq!(ws.cell_style("D3").unwrap(), &fill(Color::BLUE));
        assert!(ws.get_value("D2").unwrap().is_empty());
    }

    #[test]
    fn test_clear_column_over_styled_row() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_style(5, fill(Color::GREEN)).unwrap();
        ws.set_column_style(2, fill(Color::RED)).unwrap();
        ws.set_cell_value("B5", "x").unwrap();

        ws.clear_column(2).unwrap();

        assert_eq!(ws.cell_style("B5").unwrap(), ws.style());
        assert_eq!(ws.cell_style("C5").unwrap(), &fill(Color::GREEN));
        assert!(ws.is_empty());
    }

    #[test]
    fn test_insert_refuses_to_cut_anchored_range() {
        let mut ws = Worksheet::new("Test");
        let tall = CellRange::parse(&format!("A5:B{}", MAX_ROWS - 1)).unwrap();
        let anchor = ws.anchor_range(tall);
        let before = ws.snapshot();

        let err = ws.insert_rows_above(6, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert_eq!(ws.snapshot(), before);
        assert_eq!(ws.anchored_range(anchor), Some(tall));

        // one row still fits and widens the range up to the edge
        ws.insert_rows_above(6, 1).unwrap();
        assert_eq!(
            ws.anchored_range(anchor).map(|r| r.span_on(Axis::Row)),
            Some((5, MAX_ROWS))
        );
    }

    #[test]
    fn test_insert_keeps_whole_columns_whole() {
        let mut ws = Worksheet::new("Test");
        let columns = ws.anchor_range(CellRange::parse("C:D").unwrap());

        ws.insert_rows_above(1, 10).unwrap();
        assert_eq!(ws.anchored_range(columns), Some(CellRange::parse("C:D").unwrap()));
    }

    #[test]
    fn test_clear_column() {
        let mut ws = Worksheet::new("Test");
        ws.set_column_style(2, fill(Color::RED)).unwrap();
        ws.set_cell_value("B9", 1.0).unwrap();

        ws.clear_column(2).unwrap();
        assert_eq!(ws.column_style(2).unwrap(), &Style::default());
        assert!(ws.is_empty());
        assert!(ws.clear_column(0).is_err());
    }
}
