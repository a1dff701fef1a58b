//! Cell storage implementation
//!
//! Sparse, row-major storage: only materialized cells (content or an
//! explicit style override) have an entry. Structure:
//! `BTreeMap<row, BTreeMap<col, CellData>>`.

use std::collections::BTreeMap;

use super::{CellRange, CellValue};
use crate::shift::{shift_keys, Axis, ShiftEvent, Shiftable};
use crate::style::StyleId;

/// Data for a single materialized cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Explicit style override (None = inherit through the cascade)
    pub style: Option<StyleId>,
}

impl CellData {
    /// Create a cell with a value and no style override
    pub fn new(value: CellValue) -> Self {
        Self { value, style: None }
    }

    /// Create a cell with a value and style override
    pub fn with_style(value: CellValue, style: StyleId) -> Self {
        Self {
            value,
            style: Some(style),
        }
    }

    /// A cell with neither content nor override does not need storing
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style.is_none()
    }
}

/// Sparse row-based storage for worksheet cells
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a cell mutably
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Store a cell; empty data removes the entry instead
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let mut data = self.get(row, col).cloned().unwrap_or_default();
        data.value = value;
        self.set(row, col, data);
    }

    /// Set just the style override (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style: Option<StyleId>) {
        if let Some(cell) = self.get_mut(row, col) {
            cell.style = style;
            if !cell.is_empty() {
                return;
            }
            self.remove(row, col);
        } else if let Some(style) = style {
            self.set(row, col, CellData::with_style(CellValue::Empty, style));
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Remove every cell inside `range`, returning how many were removed
    pub fn remove_range(&mut self, range: &CellRange) -> usize {
        let cols = range.column_span();
        let mut removed = 0;
        let mut emptied = Vec::new();

        for (&row, row_map) in self.rows.range_mut(range.row_span()) {
            let before = row_map.len();
            row_map.retain(|col, _| !cols.contains(col));
            removed += before - row_map.len();
            if row_map.is_empty() {
                emptied.push(row);
            }
        }
        for row in emptied {
            self.rows.remove(&row);
        }

        removed
    }

    /// Get the number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest occupied index along an axis
    pub fn max_index(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Row => self.rows.keys().next_back().copied(),
            Axis::Column => self
                .rows
                .values()
                .filter_map(|cols| cols.keys().next_back())
                .max()
                .map(|&c| c as u32),
        }
    }

    /// Bounds of materialized cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;
        for cols in self.rows.values() {
            if let Some(&col) = cols.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = cols.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over all cells mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u16, &mut CellData)> {
        self.rows
            .iter_mut()
            .flat_map(|(&row, cols)| cols.iter_mut().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Iterate over cells in a specific row mutably
    pub fn iter_row_mut(&mut self, row: u32) -> impl Iterator<Item = (u16, &mut CellData)> {
        self.rows
            .get_mut(&row)
            .into_iter()
            .flat_map(|cols| cols.iter_mut().map(|(&col, data)| (col, data)))
    }

    /// Iterate over cells in a specific column
    pub fn iter_column(&self, col: u16) -> impl Iterator<Item = (u32, &CellData)> {
        self.rows
            .iter()
            .filter_map(move |(&row, cols)| cols.get(&col).map(|data| (row, data)))
    }

    /// Iterate over cells in a specific column mutably
    pub fn iter_column_mut(&mut self, col: u16) -> impl Iterator<Item = (u32, &mut CellData)> {
        self.rows
            .iter_mut()
            .filter_map(move |(&row, cols)| cols.get_mut(&col).map(|data| (row, data)))
    }

    /// Iterate over row indices that have cells
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }
}

impl Shiftable for CellStorage {
    fn apply_shift(&mut self, axis: Axis, event: ShiftEvent) {
        match axis {
            Axis::Row => {
                shift_keys(&mut self.rows, event);
            }
            Axis::Column => {
                for cols in self.rows.values_mut() {
                    shift_keys(cols, event);
                }
                self.rows.retain(|_, cols| !cols.is_empty());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StylePool;

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        storage.set_value(1, 1, CellValue::Number(42.0));
        assert_eq!(storage.get(1, 1).unwrap().value.as_number(), Some(42.0));
        assert!(storage.get(2, 2).is_none());
    }

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();

        storage.set_value(1, 1, CellValue::Number(42.0));
        assert_eq!(storage.cell_count(), 1);

        storage.set_value(1, 1, CellValue::Empty);
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_style_override_materializes() {
        let mut pool = StylePool::new();
        let bold = pool.get_or_insert(crate::Style::new().bold(true));
        let mut storage = CellStorage::new();

        storage.set_style(3, 4, Some(bold));
        assert_eq!(storage.get(3, 4), Some(&CellData::with_style(CellValue::Empty, bold)));

        // value survives a style reset, then the reset cell is dropped
        storage.set_value(3, 4, CellValue::from("x"));
        storage.set_style(3, 4, None);
        assert_eq!(storage.get(3, 4).unwrap().style, None);
        storage.set_value(3, 4, CellValue::Empty);
        assert!(storage.get(3, 4).is_none());
    }

    #[test]
    fn test_remove_range() {
        let mut storage = CellStorage::new();
        for row in 1..=4 {
            for col in 1..=4 {
                storage.set_value(row, col, CellValue::Number(1.0));
            }
        }

        let removed = storage.remove_range(&CellRange::parse("B2:C3").unwrap());
        assert_eq!(removed, 4);
        assert_eq!(storage.cell_count(), 12);
        assert!(storage.get(2, 2).is_none());
        assert!(storage.get(2, 4).is_some());

        let removed = storage.remove_range(&CellRange::full_row(1).unwrap());
        assert_eq!(removed, 4);
        assert_eq!(storage.row_indices().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_used_bounds_and_max_index() {
        let mut storage = CellStorage::new();
        assert!(storage.used_bounds().is_none());
        assert_eq!(storage.max_index(Axis::Row), None);

        storage.set_value(6, 4, CellValue::Number(1.0));
        storage.set_value(11, 8, CellValue::Number(2.0));
        storage.set_value(3, 2, CellValue::Number(3.0));

        assert_eq!(storage.used_bounds(), Some((3, 2, 11, 8)));
        assert_eq!(storage.max_index(Axis::Row), Some(11));
        assert_eq!(storage.max_index(Axis::Column), Some(8));
    }

    #[test]
    fn test_row_shift() {
        let mut storage = CellStorage::new();
        storage.set_value(2, 1, CellValue::from("keep"));
        storage.set_value(5, 1, CellValue::from("gone"));
        storage.set_value(9, 1, CellValue::from("moved"));

        storage.apply_shift(Axis::Row, ShiftEvent::Deleted { at: 4, count: 3 });
        assert_eq!(storage.get(2, 1).unwrap().value.as_text(), Some("keep"));
        assert_eq!(storage.get(6, 1).unwrap().value.as_text(), Some("moved"));
        assert_eq!(storage.cell_count(), 2);

        storage.apply_shift(Axis::Row, ShiftEvent::Inserted { at: 2, count: 10 });
        assert_eq!(storage.get(12, 1).unwrap().value.as_text(), Some("keep"));
        assert_eq!(storage.get(16, 1).unwrap().value.as_text(), Some("moved"));
    }

    #[test]
    fn test_column_shift() {
        let mut storage = CellStorage::new();
        storage.set_value(1, 2, CellValue::from("b"));
        storage.set_value(1, 3, CellValue::from("c"));
        storage.set_value(2, 3, CellValue::from("c2"));

        storage.apply_shift(Axis::Column, ShiftEvent::Deleted { at: 3, count: 1 });
        assert_eq!(storage.cell_count(), 1);
        assert_eq!(storage.row_indices().collect::<Vec<_>>(), vec![1]);

        storage.apply_shift(Axis::Column, ShiftEvent::Inserted { at: 1, count: 2 });
        assert_eq!(storage.get(1, 4).unwrap().value.as_text(), Some("b"));
    }
}
