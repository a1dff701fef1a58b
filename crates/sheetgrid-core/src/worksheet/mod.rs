//! Worksheet type
//!
//! A worksheet owns everything positional: the sparse cell store, one line
//! collection per axis, anchored ranges, the style pool and the shift
//! journal. Styling lives in `cascade`, inserts/deletes/clears in
//! `structure`.

mod cascade;
mod structure;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::anchor::{AnchoredRanges, RangeAnchor};
use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::config::SheetDefaults;
use crate::error::{Error, Result};
use crate::line::{Column, LineCollection, LineId, LineState, Row};
use crate::range::{Range, RangeMut};
use crate::shift::{broadcast, Axis, ShiftCursor, ShiftEvent, ShiftJournal, Shiftable};
use crate::style::{StyleId, StylePool};

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(u64);

impl SheetId {
    fn next() -> Self {
        SheetId(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    id: SheetId,
    /// Sheet name
    name: String,
    /// Materialized cells
    cells: CellStorage,
    rows: LineCollection,
    columns: LineCollection,
    anchors: AnchoredRanges,
    /// Interned styles; entry 0 is the workbook default
    styles: StylePool,
    /// Worksheet-level style (None = workbook default)
    default_style: Option<StyleId>,
    defaults: SheetDefaults,
    journal: ShiftJournal,
}

/// Comparable copy of a worksheet's positional state
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    /// Materialized cells in row order
    pub cells: Vec<(u32, u16, CellData)>,
    /// Row lines in index order
    pub rows: Vec<(u32, LineState)>,
    /// Column lines in index order
    pub columns: Vec<(u32, LineState)>,
    /// Anchored ranges in registration order
    pub anchors: Vec<(RangeAnchor, CellRange)>,
    /// Worksheet-level style
    pub default_style: Option<StyleId>,
}

impl Worksheet {
    /// Create a new worksheet with the given name and stock defaults
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::build(name.into(), SheetDefaults::default())
    }

    /// Create a worksheet with custom defaults
    pub fn with_defaults<S: Into<String>>(name: S, defaults: SheetDefaults) -> Result<Self> {
        defaults.validate()?;
        Ok(Self::build(name.into(), defaults))
    }

    fn build(name: String, defaults: SheetDefaults) -> Self {
        Self {
            id: SheetId::next(),
            name,
            cells: CellStorage::new(),
            rows: LineCollection::new(Axis::Row),
            columns: LineCollection::new(Axis::Column),
            anchors: AnchoredRanges::new(),
            styles: StylePool::with_default(defaults.style.clone()),
            default_style: None,
            defaults,
            journal: ShiftJournal::new(),
        }
    }

    /// Identity used to match handles to this sheet
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Defaults this sheet falls back to
    pub fn defaults(&self) -> &SheetDefaults {
        &self.defaults
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row(), addr.col()))
    }

    /// Get a cell by row and column numbers
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row(), addr.col()))
    }

    /// Get cell value by row and column numbers
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.cells.set_value(addr.row(), addr.col(), value.into());
        Ok(())
    }

    /// Set a cell value by row and column numbers
    pub fn set_cell_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) -> Result<()> {
        let addr = CellAddress::new(row, col)?;
        self.cells.set_value(addr.row(), addr.col(), value.into());
        Ok(())
    }

    /// Set a cell formula by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        self.set_cell_value(address, CellValue::formula(formula))
    }

    /// Clear a cell's value and style override
    pub fn clear_cell(&mut self, address: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.cells.remove(addr.row(), addr.col());
        Ok(())
    }

    /// Fill every cell of a range with the same value
    pub fn fill_range<V: Into<CellValue> + Clone>(&mut self, range: &CellRange, value: V) {
        let value = value.into();
        for addr in range.cells() {
            self.cells.set_value(addr.row(), addr.col(), value.clone());
        }
    }

    /// Get the number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet has no materialized cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all materialized cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Smallest range containing every materialized cell
    pub fn used_range(&self) -> Option<CellRange> {
        let (min_row, min_col, max_row, max_col) = self.cells.used_bounds()?;
        CellRange::from_indices(min_row, min_col, max_row, max_col).ok()
    }

    /// Read-only view over a range (e.g., "A1:C3")
    pub fn range(&self, address: &str) -> Result<Range<'_>> {
        Ok(Range::new(self, CellRange::parse(address)?))
    }

    /// Mutable view over a range
    pub fn range_mut(&mut self, address: &str) -> Result<RangeMut<'_>> {
        let range = CellRange::parse(address)?;
        Ok(RangeMut::new(self, range))
    }

    // === Rows and Columns ===

    /// Handle to a row, creating its line on first access
    pub fn row(&mut self, row: u32) -> Result<Row> {
        let row = Axis::Row.validate(row as u64)?;
        Ok(Row::bound(self.id, self.rows.ensure(row)))
    }

    /// Handle to a column, creating its line on first access
    pub fn column(&mut self, col: u16) -> Result<Column> {
        let col = Axis::Column.validate(col as u64)?;
        Ok(Column::bound(self.id, self.columns.ensure(col)))
    }

    /// Row lines that exist on this sheet
    pub fn rows(&self) -> &LineCollection {
        &self.rows
    }

    /// Column lines that exist on this sheet
    pub fn columns(&self) -> &LineCollection {
        &self.columns
    }

    pub(crate) fn lines(&self, axis: Axis) -> &LineCollection {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    pub(crate) fn lines_mut(&mut self, axis: Axis) -> &mut LineCollection {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    /// Current index of a bound handle's line
    pub(crate) fn resolve_line(&self, axis: Axis, sheet: SheetId, id: LineId) -> Result<u32> {
        if sheet != self.id {
            log::warn!(
                "{} handle from sheet {:?} used against sheet '{}'",
                axis.name(),
                sheet,
                self.name
            );
            return Err(Error::invalid_state(format!(
                "{} handle belongs to another worksheet",
                axis.name()
            )));
        }
        self.lines(axis).index_of(id).ok_or_else(|| {
            log::warn!("stale {} handle used on sheet '{}'", axis.name(), self.name);
            Error::invalid_state(format!("{} was deleted", axis.name()))
        })
    }

    pub(crate) fn line_size(&self, axis: Axis, index: u32) -> f64 {
        let fallback = match axis {
            Axis::Row => self.defaults.row_height,
            Axis::Column => self.defaults.column_width,
        };
        self.lines(axis)
            .get(index)
            .and_then(|line| line.size)
            .unwrap_or(fallback)
    }

    pub(crate) fn set_line_size(&mut self, axis: Axis, index: u32, size: f64) -> Result<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::InvalidDimension(size));
        }
        self.lines_mut(axis).ensure_mut(index).size = Some(size);
        Ok(())
    }

    /// Row height in points
    pub fn row_height(&self, row: u32) -> Result<f64> {
        let row = Axis::Row.validate(row as u64)?;
        Ok(self.line_size(Axis::Row, row))
    }

    /// Set row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        let row = Axis::Row.validate(row as u64)?;
        self.set_line_size(Axis::Row, row, height)
    }

    /// Column width in characters
    pub fn column_width(&self, col: u16) -> Result<f64> {
        let col = Axis::Column.validate(col as u64)?;
        Ok(self.line_size(Axis::Column, col))
    }

    /// Set column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        let col = Axis::Column.validate(col as u64)?;
        self.set_line_size(Axis::Column, col, width)
    }

    /// Copy a row template's height and style onto `row`
    pub fn apply_row_template(&mut self, row: u32, template: &Row) -> Result<()> {
        let row = Axis::Row.validate(row as u64)?;
        let (size, style) = template.template_parts(self)?;
        self.set_line_size(Axis::Row, row, size)?;
        self.set_line_style(Axis::Row, row, style)
    }

    /// Copy a column template's width and style onto `col`
    pub fn apply_column_template(&mut self, col: u16, template: &Column) -> Result<()> {
        let col = Axis::Column.validate(col as u64)?;
        let (size, style) = template.template_parts(self)?;
        self.set_line_size(Axis::Column, col, size)?;
        self.set_line_style(Axis::Column, col, style)
    }

    // === Anchored Ranges ===

    /// Track a range so it follows inserts and deletes.
    ///
    /// The range stays registered until released or until a delete removes
    /// every line it covers.
    pub fn anchor_range(&mut self, range: CellRange) -> RangeAnchor {
        self.anchors.add(range)
    }

    /// Current extent of an anchored range; None once deleted away or released
    pub fn anchored_range(&self, anchor: RangeAnchor) -> Option<CellRange> {
        self.anchors.get(anchor)
    }

    /// Stop tracking a range
    pub fn release_range(&mut self, anchor: RangeAnchor) -> bool {
        self.anchors.release(anchor)
    }

    // === Shift Journal ===

    /// Every structural shift applied so far
    pub fn journal(&self) -> &ShiftJournal {
        &self.journal
    }

    /// Cursor for translating indices observed now
    pub fn shift_cursor(&self) -> ShiftCursor {
        self.journal.cursor()
    }

    /// Forget shifts recorded before `cursor`; older cursors stop rebasing
    pub fn discard_shifts_before(&mut self, cursor: ShiftCursor) {
        self.journal.discard_before(cursor);
        log::trace!("journal of '{}' holds {} events", self.name, self.journal.len());
    }

    /// Translate a row number observed at `cursor`; None if it was deleted since
    pub fn rebase_row(&self, row: u32, cursor: ShiftCursor) -> Option<u32> {
        self.journal.rebase(Axis::Row, row, cursor)
    }

    /// Translate a column number observed at `cursor`; None if it was deleted since
    pub fn rebase_column(&self, col: u16, cursor: ShiftCursor) -> Option<u16> {
        self.journal
            .rebase(Axis::Column, col as u32, cursor)
            .map(|c| c as u16)
    }

    /// Deliver one event to every positional part and record it
    fn apply_shift(&mut self, axis: Axis, event: ShiftEvent) {
        let lines = match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        };
        let mut subscribers: [&mut dyn Shiftable; 3] = [&mut self.cells, lines, &mut self.anchors];
        broadcast(&mut subscribers, axis, event);
        self.journal.record(axis, event);
    }

    /// Comparable copy of all positional state
    pub fn snapshot(&self) -> SheetSnapshot {
        SheetSnapshot {
            cells: self
                .cells
                .iter()
                .map(|(row, col, data)| (row, col, data.clone()))
                .collect(),
            rows: self.rows.iter().map(|(i, s)| (i, *s)).collect(),
            columns: self.columns.iter().map(|(i, s)| (i, *s)).collect(),
            anchors: self.anchors.iter().collect(),
            default_style: self.default_style,
        }
    }
}
