//! Range views over a worksheet

use crate::anchor::RangeAnchor;
use crate::cell::{CellAddress, CellData, CellRange, CellValue};
use crate::error::Result;
use crate::style::Style;
use crate::worksheet::Worksheet;

/// A reference to a range of cells in a worksheet
pub struct Range<'a> {
    worksheet: &'a Worksheet,
    range: CellRange,
}

impl<'a> Range<'a> {
    /// Create a new range reference
    pub fn new(worksheet: &'a Worksheet, range: CellRange) -> Self {
        Self { worksheet, range }
    }

    /// Get the cell range
    pub fn range(&self) -> &CellRange {
        &self.range
    }

    /// Get the number of rows
    pub fn row_count(&self) -> u32 {
        self.range.row_count()
    }

    /// Get the number of columns
    pub fn col_count(&self) -> u16 {
        self.range.col_count()
    }

    /// Get a cell by 0-based offset from the top-left corner
    pub fn cell(&self, row_offset: u32, col_offset: u16) -> Option<&'a CellData> {
        let (row, col) = self.absolute(row_offset, col_offset)?;
        self.worksheet.cell_at(row, col)
    }

    /// Get a cell value by 0-based offset
    pub fn value(&self, row_offset: u32, col_offset: u16) -> CellValue {
        self.absolute(row_offset, col_offset)
            .map(|(row, col)| self.worksheet.get_value_at(row, col))
            .unwrap_or(CellValue::Empty)
    }

    fn absolute(&self, row_offset: u32, col_offset: u16) -> Option<(u32, u16)> {
        let start = self.range.start();
        let row = start.row().checked_add(row_offset)?;
        let col = start.col().checked_add(col_offset)?;
        let addr = CellAddress::new(row, col).ok()?;
        self.range.contains(&addr).then_some((row, col))
    }

    /// Iterate over every cell in the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = RangeCell<'a>> + '_ {
        let worksheet = self.worksheet;
        self.range.cells().map(move |address| RangeCell {
            address,
            data: worksheet.cell_at(address.row(), address.col()),
            style: worksheet.effective_style(address),
        })
    }

    /// Iterate over materialized cells only
    pub fn used_cells(&self) -> impl Iterator<Item = (CellAddress, &'a CellData)> + '_ {
        let rows = self.range.row_span();
        let cols = self.range.column_span();
        self.worksheet
            .iter_cells()
            .filter(move |(row, col, _)| rows.contains(row) && cols.contains(col))
            .filter_map(|(row, col, data)| CellAddress::new(row, col).ok().map(|a| (a, data)))
    }

    /// Get the A1-style address of this range
    pub fn address(&self) -> String {
        self.range.to_a1_string()
    }
}

/// A mutable reference to a range of cells
pub struct RangeMut<'a> {
    worksheet: &'a mut Worksheet,
    range: CellRange,
}

impl<'a> RangeMut<'a> {
    /// Create a new mutable range reference
    pub fn new(worksheet: &'a mut Worksheet, range: CellRange) -> Self {
        Self { worksheet, range }
    }

    /// Get the cell range
    pub fn range(&self) -> &CellRange {
        &self.range
    }

    /// Set a cell value by 0-based offset from the top-left corner
    pub fn set_value<V: Into<CellValue>>(&mut self, row_offset: u32, col_offset: u16, value: V) -> Result<()> {
        let start = self.range.start();
        let addr = CellAddress::new(
            start.row().saturating_add(row_offset),
            start.col().saturating_add(col_offset),
        )?;
        if !self.range.contains(&addr) {
            return Err(crate::Error::InvalidAddress(format!(
                "{} is outside {}",
                addr, self.range
            )));
        }
        self.worksheet.set_cell_value_at(addr.row(), addr.col(), value)
    }

    /// Set all cells to the same value
    pub fn fill<V: Into<CellValue> + Clone>(&mut self, value: V) {
        self.worksheet.fill_range(&self.range, value);
    }

    /// Clear all cells in the range
    pub fn clear(&mut self) {
        self.worksheet.clear_range(&self.range);
    }

    /// Set style for the range
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.worksheet.set_range_style(&self.range, style)
    }

    /// Keep tracking this range across structural edits
    pub fn anchor(&mut self) -> RangeAnchor {
        self.worksheet.anchor_range(self.range)
    }
}

/// A cell within a range iteration
pub struct RangeCell<'a> {
    /// The cell's address
    pub address: CellAddress,
    /// The cell data (if materialized)
    pub data: Option<&'a CellData>,
    /// The style the cell shows
    pub style: &'a Style,
}

impl<'a> RangeCell<'a> {
    /// Get the cell value
    pub fn value(&self) -> CellValue {
        self.data
            .map(|d| d.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Check if the cell has no value
    pub fn is_empty(&self) -> bool {
        self.data.map(|d| d.value.is_empty()).unwrap_or(true)
    }

    /// Get the row number
    pub fn row(&self) -> u32 {
        self.address.row()
    }

    /// Get the column number
    pub fn col(&self) -> u16 {
        self.address.col()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_range_view() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("B2", 1.0).unwrap();
        ws.set_cell_value("C3", 2.0).unwrap();
        ws.set_cell_value("F9", 3.0).unwrap();

        let range = ws.range("B2:C3").unwrap();
        assert_eq!(range.row_count(), 2);
        assert_eq!(range.col_count(), 2);
        assert_eq!(range.cells().count(), 4);
        assert_eq!(range.used_cells().count(), 2);
        assert_eq!(range.value(1, 1).as_number(), Some(2.0));
        assert!(range.cell(2, 0).is_none());
        assert_eq!(range.address(), "B2:C3");
    }

    #[test]
    fn test_range_mut() {
        let mut ws = Worksheet::new("Test");
        let red = Style::new().fill_color(Color::RED);

        {
            let mut range = ws.range_mut("A1:B2").unwrap();
            range.fill(7.0);
            range.set_value(1, 1, "corner").unwrap();
            assert!(range.set_value(2, 0, 1.0).is_err());
            range.set_style(red.clone()).unwrap();
        }
        assert_eq!(ws.get_value("B2").unwrap().as_text(), Some("corner"));
        assert_eq!(ws.cell_style("A2").unwrap(), &red);

        let view = ws.range("A1:B2").unwrap();
        assert!(view.cells().all(|cell| cell.style == &red && !cell.is_empty()));

        ws.range_mut("A1:B2").unwrap().clear();
        assert!(ws.is_empty());
    }
}
