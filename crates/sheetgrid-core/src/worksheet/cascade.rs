//! Style cascade
//!
//! The style a cell shows is resolved, most specific first, from:
//! the cell's own override, its column line, its row line, the worksheet
//! style, and finally the workbook default. Reads never materialize cells.
//!
//! Writes push eagerly: giving a row a style also restyles every
//! materialized cell in it, and materializes style-only cells where the row
//! crosses a styled column, so the row's style wins there afterwards.

use super::Worksheet;
use crate::cell::{validate_col, validate_row, CellAddress, CellRange};
use crate::error::Result;
use crate::shift::Axis;
use crate::style::{Style, StyleId, StylePool};

impl Worksheet {
    /// Interned styles of this sheet
    pub fn style_pool(&self) -> &StylePool {
        &self.styles
    }

    pub(crate) fn sheet_style_id(&self) -> StyleId {
        self.default_style.unwrap_or(StyleId::DEFAULT)
    }

    /// Worksheet-level style (the workbook default until one is set)
    pub fn style(&self) -> &Style {
        self.styles.resolve(self.sheet_style_id())
    }

    /// Set the worksheet style and push it into every line and cell
    pub fn set_style(&mut self, style: Style) {
        let id = self.styles.get_or_insert(style);
        self.default_style = Some(id);

        for lines in [&mut self.rows, &mut self.columns] {
            let last = lines.max_index().unwrap_or(0);
            for (_, state) in lines.span_mut(1, last) {
                state.style = Some(id);
            }
        }
        for (_, _, cell) in self.cells.iter_mut() {
            cell.style = Some(id);
        }
        log::debug!("set worksheet style of '{}' to {:?}", self.name, id);
    }

    pub(crate) fn line_style_id(&self, axis: Axis, index: u32) -> StyleId {
        self.lines(axis)
            .get(index)
            .and_then(|line| line.style)
            .unwrap_or_else(|| self.sheet_style_id())
    }

    pub(crate) fn line_style(&self, axis: Axis, index: u32) -> &Style {
        self.styles.resolve(self.line_style_id(axis, index))
    }

    /// Style of a row line (the worksheet style if the row has none)
    pub fn row_style(&self, row: u32) -> Result<&Style> {
        let row = validate_row(row as u64)?;
        Ok(self.line_style(Axis::Row, row))
    }

    /// Style of a column line (the worksheet style if the column has none)
    pub fn column_style(&self, col: u16) -> Result<&Style> {
        let col = validate_col(col as u64)?;
        Ok(self.line_style(Axis::Column, col as u32))
    }

    /// Resolved style id of a cell; coordinates must already be valid
    pub(crate) fn effective_style_id(&self, row: u32, col: u16) -> StyleId {
        if let Some(id) = self.cells.get(row, col).and_then(|cell| cell.style) {
            return id;
        }
        if let Some(id) = self.columns.get(col as u32).and_then(|line| line.style) {
            return id;
        }
        if let Some(id) = self.rows.get(row).and_then(|line| line.style) {
            return id;
        }
        self.sheet_style_id()
    }

    /// Style a cell shows
    pub fn effective_style(&self, addr: CellAddress) -> &Style {
        self.styles
            .resolve(self.effective_style_id(addr.row(), addr.col()))
    }

    /// Style a cell shows, by row and column numbers
    pub fn cell_style_at(&self, row: u32, col: u16) -> Result<&Style> {
        Ok(self.effective_style(CellAddress::new(row, col)?))
    }

    /// Style a cell shows, by address string
    pub fn cell_style(&self, address: &str) -> Result<&Style> {
        Ok(self.effective_style(CellAddress::parse(address)?))
    }

    /// Give one cell a style override
    pub fn set_cell_style(&mut self, address: &str, style: Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        let id = self.styles.get_or_insert(style);
        self.cells.set_style(addr.row(), addr.col(), Some(id));
        Ok(())
    }

    /// Give one cell a style override, by row and column numbers
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: Style) -> Result<()> {
        let addr = CellAddress::new(row, col)?;
        let id = self.styles.get_or_insert(style);
        self.cells.set_style(addr.row(), addr.col(), Some(id));
        Ok(())
    }

    /// Set a row's style and push it into the row
    pub fn set_row_style(&mut self, row: u32, style: Style) -> Result<()> {
        let row = validate_row(row as u64)?;
        self.set_line_style(Axis::Row, row, style)
    }

    /// Set a column's style and push it into the column
    pub fn set_column_style(&mut self, col: u16, style: Style) -> Result<()> {
        let col = validate_col(col as u64)?;
        self.set_line_style(Axis::Column, col as u32, style)
    }

    /// Intern and assign a line style; `index` must already be valid
    pub(crate) fn set_line_style(&mut self, axis: Axis, index: u32, style: Style) -> Result<()> {
        let id = self.styles.get_or_insert(style);
        self.assign_line_style(axis, index, id);
        log::debug!(
            "set {} {} style to {:?} on '{}'",
            axis.name(),
            index,
            id,
            self.name
        );
        Ok(())
    }

    /// Eager push of an interned style into a line
    pub(crate) fn assign_line_style(&mut self, axis: Axis, index: u32, id: StyleId) {
        self.lines_mut(axis).ensure_mut(index).style = Some(id);

        match axis {
            Axis::Row => {
                for (_, cell) in self.cells.iter_row_mut(index) {
                    cell.style = Some(id);
                }
                let styled: Vec<u16> = self
                    .columns
                    .iter()
                    .filter(|(_, line)| line.style.is_some())
                    .map(|(col, _)| col as u16)
                    .collect();
                for col in styled {
                    self.cells.set_style(index, col, Some(id));
                }
            }
            Axis::Column => {
                for (_, cell) in self.cells.iter_column_mut(index as u16) {
                    cell.style = Some(id);
                }
            }
        }
    }

    /// Style a range. Whole rows and whole columns go through their lines;
    /// any other range materializes every cell it covers.
    pub fn set_range_style(&mut self, range: &CellRange, style: Style) -> Result<()> {
        match (range.is_full_rows(), range.is_full_columns()) {
            (true, true) => self.set_style(style),
            (true, false) => {
                let id = self.styles.get_or_insert(style);
                for row in range.row_span() {
                    self.assign_line_style(Axis::Row, row, id);
                }
            }
            (false, true) => {
                let id = self.styles.get_or_insert(style);
                for col in range.column_span() {
                    self.assign_line_style(Axis::Column, col as u32, id);
                }
            }
            (false, false) => {
                let id = self.styles.get_or_insert(style);
                for addr in range.cells() {
                    self.cells.set_style(addr.row(), addr.col(), Some(id));
                }
            }
        }
        log::debug!("styled range {} on '{}'", range, self.name);
        Ok(())
    }

    /// Styles that make up the look of a row, lazily:
    /// the row's own style, then each materialized cell's style, then the
    /// resolved style of every remaining column up to the highest column
    /// line.
    pub fn row_styles(&self, row: u32) -> Result<impl Iterator<Item = &Style> + '_> {
        let row = validate_row(row as u64)?;
        let max_col = self.columns.max_index().unwrap_or(0) as u16;

        let own = std::iter::once(self.line_style_id(Axis::Row, row));
        let cells = self
            .cells
            .iter_row(row)
            .map(move |(col, _)| self.effective_style_id(row, col));
        let rest = (1..=max_col)
            .filter(move |&col| self.cells.get(row, col).is_none())
            .map(move |col| self.effective_style_id(row, col));

        Ok(own
            .chain(cells)
            .chain(rest)
            .map(move |id| self.styles.resolve(id)))
    }

    /// Column analogue of [`row_styles`](Self::row_styles), bounded by the
    /// highest row line
    pub fn column_styles(&self, col: u16) -> Result<impl Iterator<Item = &Style> + '_> {
        let col = validate_col(col as u64)?;
        let max_row = self.rows.max_index().unwrap_or(0);

        let own = std::iter::once(self.line_style_id(Axis::Column, col as u32));
        let cells = self
            .cells
            .iter_column(col)
            .map(move |(row, _)| self.effective_style_id(row, col));
        let rest = (1..=max_row)
            .filter(move |&row| self.cells.get(row, col).is_none())
            .map(move |row| self.effective_style_id(row, col));

        Ok(own
            .chain(cells)
            .chain(rest)
            .map(move |id| self.styles.resolve(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    fn red() -> Style {
        Style::new().fill_color(Color::RED)
    }

    fn blue() -> Style {
        Style::new().fill_color(Color::BLUE)
    }

    #[test]
    fn test_cascade_order() {
        let mut ws = Worksheet::new("Test");
        assert_eq!(ws.cell_style("C3").unwrap(), &Style::default());

        ws.set_style(Style::new().italic(true));
        assert!(ws.cell_style("C3").unwrap().font.italic);

        ws.set_row_style(3, red()).unwrap();
        assert_eq!(ws.cell_style("C3").unwrap(), &red());

        ws.set_column_style(3, blue()).unwrap();
        assert_eq!(ws.cell_style("C3").unwrap(), &blue());
        assert_eq!(ws.cell_style("D3").unwrap(), &red());

        ws.set_cell_style("C3", Style::new().bold(true)).unwrap();
        assert!(ws.cell_style("C3").unwrap().font.bold);
    }

    #[test]
    fn test_reads_do_not_materialize() {
        let mut ws = Worksheet::new("Test");
        ws.set_column_style(2, red()).unwrap();

        let _ = ws.cell_style("B7").unwrap();
        let _ = ws.row_styles(7).unwrap().count();
        assert_eq!(ws.cell_count(), 0);
    }

    #[test]
    fn test_row_style_pushes_into_cells_and_styled_columns() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A2", 1.0).unwrap();
        ws.set_cell_style("B2", blue()).unwrap();
        ws.set_column_style(4, blue()).unwrap();
        ws.column(6).unwrap(); // unstyled column line

        ws.set_row_style(2, red()).unwrap();

        assert_eq!(ws.cell_style("A2").unwrap(), &red());
        assert_eq!(ws.cell_style("B2").unwrap(), &red());
        // materialized at the styled column crossing
        assert!(ws.cell("D2").unwrap().is_some());
        assert_eq!(ws.cell_style("D2").unwrap(), &red());
        // other rows still see the column
        assert_eq!(ws.cell_style("D3").unwrap(), &blue());
        assert!(ws.cell("F2").unwrap().is_none());
    }

    #[test]
    fn test_column_style_pushes_into_cells() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_style("C5", red()).unwrap();
        ws.set_row_style(8, red()).unwrap();

        ws.set_column_style(3, blue()).unwrap();
        assert_eq!(ws.cell_style("C5").unwrap(), &blue());
        assert_eq!(ws.cell_style("C8").unwrap(), &blue());
        assert_eq!(ws.cell_count(), 1);
    }

    #[test]
    fn test_worksheet_style_overwrites_everything() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_style(1, red()).unwrap();
        ws.set_cell_style("E5", blue()).unwrap();

        let green = Style::new().fill_color(Color::GREEN);
        ws.set_style(green.clone());
        assert_eq!(ws.style(), &green);
        assert_eq!(ws.row_style(1).unwrap(), &green);
        assert_eq!(ws.cell_style("E5").unwrap(), &green);
        assert_eq!(ws.cell_style("Z100").unwrap(), &green);
    }

    #[test]
    fn test_range_style() {
        let mut ws = Worksheet::new("Test");

        ws.set_range_style(&CellRange::parse("B2:C3").unwrap(), red()).unwrap();
        assert_eq!(ws.cell_count(), 4);
        assert_eq!(ws.cell_style("C3").unwrap(), &red());
        assert_eq!(ws.cell_style("D3").unwrap(), &Style::default());

        ws.set_range_style(&CellRange::parse("5:6").unwrap(), blue()).unwrap();
        assert_eq!(ws.row_style(6).unwrap(), &blue());
        assert_eq!(ws.cell_count(), 4);

        ws.set_range_style(&CellRange::parse("H:H").unwrap(), red()).unwrap();
        assert_eq!(ws.column_style(8).unwrap(), &red());
    }

    #[test]
    fn test_row_styles_sequence() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_style(1, red()).unwrap();
        ws.set_cell_style("B1", blue()).unwrap();
        ws.column(3).unwrap();

        let styles: Vec<&Style> = ws.row_styles(1).unwrap().collect();
        // own, B1, then A1 and C1 resolved through the row
        assert_eq!(styles, vec![&red(), &blue(), &red(), &red()]);

        // recomputed when column lines appear
        ws.column(5).unwrap();
        assert_eq!(ws.row_styles(1).unwrap().count(), 6);
    }

    #[test]
    fn test_column_styles_sequence() {
        let mut ws = Worksheet::new("Test");
        ws.row(2).unwrap();
        let styles: Vec<&Style> = ws.column_styles(1).unwrap().collect();
        assert_eq!(styles.len(), 3);
        assert!(ws.column_styles(0).is_err());
    }
}
