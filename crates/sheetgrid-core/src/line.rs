//! Row and column lines
//!
//! A worksheet owns one [`LineCollection`] per axis. Each entry holds the
//! per-index state of a row or column ([`LineState`]) under a stable
//! [`LineId`] that survives every structural shift.
//!
//! [`Row`] and [`Column`] are handles over those entries. A handle is either
//! *bound* (sheet id + line id, all state lives in the worksheet) or
//! *standalone* (owns its own size and style and ignores shifts, useful as a
//! template that is not yet part of a sheet).

use std::collections::BTreeMap;
use std::marker::PhantomData;

use ahash::AHashMap;

use crate::cell::CellRange;
use crate::error::{Error, Result};
use crate::shift::{shift_keys, Axis, ShiftEvent, Shiftable};
use crate::style::{Style, StyleId};
use crate::worksheet::{SheetId, Worksheet};

/// Per-index state of one row or column
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineState {
    /// Height (rows, points) or width (columns, characters); None = sheet default
    pub size: Option<f64>,
    /// Explicit style; None = inherit the sheet default
    pub style: Option<StyleId>,
}

/// Stable identity of a line inside its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

#[derive(Debug, Clone)]
struct LineSlot {
    index: u32,
    state: LineState,
}

/// Index-keyed owning collection of lines for one axis
///
/// At most one entry exists per index. Inserting at an occupied index
/// overwrites that entry's state and keeps its id.
#[derive(Debug, Clone)]
pub struct LineCollection {
    axis: Axis,
    next_id: u64,
    by_index: BTreeMap<u32, LineId>,
    slots: AHashMap<LineId, LineSlot>,
}

impl LineCollection {
    /// Create an empty collection for `axis`
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            next_id: 0,
            by_index: BTreeMap::new(),
            slots: AHashMap::new(),
        }
    }

    /// Axis this collection tracks
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// State of the line at `index`, if it exists
    pub fn get(&self, index: u32) -> Option<&LineState> {
        let id = self.by_index.get(&index)?;
        self.slots.get(id).map(|slot| &slot.state)
    }

    /// Mutable state of the line at `index`, if it exists
    pub fn get_mut(&mut self, index: u32) -> Option<&mut LineState> {
        let id = self.by_index.get(&index)?;
        self.slots.get_mut(id).map(|slot| &mut slot.state)
    }

    /// Id of the line at `index`, if it exists
    pub fn id_at(&self, index: u32) -> Option<LineId> {
        self.by_index.get(&index).copied()
    }

    /// Current index of a line, or None once it has been deleted
    pub fn index_of(&self, id: LineId) -> Option<u32> {
        self.slots.get(&id).map(|slot| slot.index)
    }

    /// State of a line by id
    pub fn state(&self, id: LineId) -> Option<&LineState> {
        self.slots.get(&id).map(|slot| &slot.state)
    }

    /// Return the line at `index`, creating a blank one if absent
    pub fn ensure(&mut self, index: u32) -> LineId {
        if let Some(&id) = self.by_index.get(&index) {
            return id;
        }
        self.insert(index, LineState::default())
    }

    /// Mutable state of the line at `index`, creating it if absent
    pub fn ensure_mut(&mut self, index: u32) -> &mut LineState {
        let id = self.ensure(index);
        &mut self
            .slots
            .entry(id)
            .or_insert(LineSlot {
                index,
                state: LineState::default(),
            })
            .state
    }

    /// Put `state` at `index`, overwriting any existing entry
    pub fn insert(&mut self, index: u32, state: LineState) -> LineId {
        if let Some(&id) = self.by_index.get(&index) {
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.state = state;
            }
            return id;
        }

        let id = LineId(self.next_id);
        self.next_id += 1;
        self.by_index.insert(index, id);
        self.slots.insert(id, LineSlot { index, state });
        id
    }

    /// Remove the line at `index`
    pub fn remove(&mut self, index: u32) -> Option<LineState> {
        let id = self.by_index.remove(&index)?;
        self.slots.remove(&id).map(|slot| slot.state)
    }

    /// Remove every line in `first..=last`, returning how many existed
    pub fn remove_span(&mut self, first: u32, last: u32) -> usize {
        if first > last {
            return 0;
        }
        let ids: Vec<u32> = self.by_index.range(first..=last).map(|(&i, _)| i).collect();
        ids.iter().filter(|&&i| self.remove(i).is_some()).count()
    }

    /// Highest occupied index, read from the live key set
    pub fn max_index(&self) -> Option<u32> {
        self.by_index.keys().next_back().copied()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// True if no line exists
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Iterate over `(index, state)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LineState)> + '_ {
        self.by_index
            .iter()
            .filter_map(|(&index, id)| self.slots.get(id).map(|slot| (index, &slot.state)))
    }

    /// Iterate mutably over the lines in `first..=last`
    pub fn span_mut(&mut self, first: u32, last: u32) -> impl Iterator<Item = (u32, &mut LineState)> {
        let wanted: AHashMap<LineId, u32> = if first > last {
            AHashMap::new()
        } else {
            self.by_index
                .range(first..=last)
                .map(|(&index, &id)| (id, index))
                .collect()
        };
        self.slots
            .iter_mut()
            .filter_map(move |(id, slot)| wanted.get(id).map(|&index| (index, &mut slot.state)))
    }
}

impl Shiftable for LineCollection {
    fn apply_shift(&mut self, axis: Axis, event: ShiftEvent) {
        if axis != self.axis {
            return;
        }

        for id in shift_keys(&mut self.by_index, event) {
            self.slots.remove(&id);
        }
        for (&index, id) in self.by_index.range(event.at()..) {
            if let Some(slot) = self.slots.get_mut(id) {
                slot.index = index;
            }
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::RowAxis {}
    impl Sealed for super::ColumnAxis {}
}

/// Type-level axis of a [`Line`] handle
pub trait LineAxis: sealed::Sealed + std::fmt::Debug + Clone + Copy + PartialEq {
    const AXIS: Axis;
}

/// Marker for row handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowAxis;

/// Marker for column handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnAxis;

impl LineAxis for RowAxis {
    const AXIS: Axis = Axis::Row;
}

impl LineAxis for ColumnAxis {
    const AXIS: Axis = Axis::Column;
}

#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Standalone { index: u32, size: f64, style: Style },
    Bound { sheet: SheetId, id: LineId },
}

/// Handle to a row or column; see the module docs
#[derive(Debug, Clone, PartialEq)]
pub struct Line<A: LineAxis> {
    binding: Binding,
    _axis: PhantomData<A>,
}

/// Row handle
pub type Row = Line<RowAxis>;

/// Column handle
pub type Column = Line<ColumnAxis>;

fn validate_size(size: f64) -> Result<f64> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(Error::InvalidDimension(size))
    }
}

impl<A: LineAxis> Line<A> {
    pub(crate) fn bound(sheet: SheetId, id: LineId) -> Self {
        Self {
            binding: Binding::Bound { sheet, id },
            _axis: PhantomData,
        }
    }

    /// Create a standalone line that is not part of any sheet
    pub fn standalone(index: u32, size: f64, style: Style) -> Result<Self> {
        let index = A::AXIS.validate(index as u64)?;
        let size = validate_size(size)?;
        Ok(Self {
            binding: Binding::Standalone { index, size, style },
            _axis: PhantomData,
        })
    }

    /// True if this handle delegates to a worksheet
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    /// Current index. Bound handles reflect every shift since they were created.
    pub fn index(&self, ws: &Worksheet) -> Result<u32> {
        match &self.binding {
            Binding::Standalone { index, .. } => Ok(*index),
            Binding::Bound { sheet, id } => ws.resolve_line(A::AXIS, *sheet, *id),
        }
    }

    /// Height (rows) or width (columns)
    pub fn size(&self, ws: &Worksheet) -> Result<f64> {
        match &self.binding {
            Binding::Standalone { size, .. } => Ok(*size),
            Binding::Bound { .. } => Ok(ws.line_size(A::AXIS, self.index(ws)?)),
        }
    }

    /// Set the height (rows) or width (columns); must be positive
    pub fn set_size(&mut self, ws: &mut Worksheet, value: f64) -> Result<()> {
        let value = validate_size(value)?;
        match &mut self.binding {
            Binding::Standalone { size, .. } => {
                *size = value;
                Ok(())
            }
            Binding::Bound { sheet, id } => {
                let index = ws.resolve_line(A::AXIS, *sheet, *id)?;
                ws.set_line_size(A::AXIS, index, value)
            }
        }
    }

    /// The line's own style (the sheet default when it has none)
    pub fn style<'a>(&'a self, ws: &'a Worksheet) -> Result<&'a Style> {
        match &self.binding {
            Binding::Standalone { style, .. } => Ok(style),
            Binding::Bound { .. } => Ok(ws.line_style(A::AXIS, self.index(ws)?)),
        }
    }

    /// Assign a style. Bound handles push it into the sheet eagerly.
    pub fn set_style(&mut self, ws: &mut Worksheet, value: Style) -> Result<()> {
        match &mut self.binding {
            Binding::Standalone { style, .. } => {
                *style = value;
                Ok(())
            }
            Binding::Bound { sheet, id } => {
                let index = ws.resolve_line(A::AXIS, *sheet, *id)?;
                ws.set_line_style(A::AXIS, index, value)
            }
        }
    }

    /// Delete this line, shifting later lines back by one
    pub fn delete(self, ws: &mut Worksheet) -> Result<()> {
        let index = self.bound_index(ws, "delete")?;
        ws.delete_lines(A::AXIS, index, 1)
    }

    /// Insert `count` blank lines before this one
    pub fn insert_before(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        let index = self.bound_index(ws, "insert")?;
        ws.insert_lines(A::AXIS, index, count, false)
    }

    /// Insert `count` blank lines after this one
    pub fn insert_after(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        let index = self.bound_index(ws, "insert")?;
        ws.insert_lines(A::AXIS, index, count, true)
    }

    /// Remove content and overrides along the line and reset its style.
    ///
    /// The line keeps its index and its entry.
    pub fn clear(&self, ws: &mut Worksheet) -> Result<()> {
        let index = self.bound_index(ws, "clear")?;
        let range = ws_line_range(A::AXIS, index)?;
        ws.clear_range(&range);
        Ok(())
    }

    /// Whole-row or whole-column range at the current index
    pub fn as_range(&self, ws: &Worksheet) -> Result<CellRange> {
        ws_line_range(A::AXIS, self.index(ws)?)
    }

    /// Distinct contributors to the look of this line; see [`Worksheet::row_styles`]
    pub fn styles<'a>(&'a self, ws: &'a Worksheet) -> Result<Box<dyn Iterator<Item = &'a Style> + 'a>> {
        let index = self.bound_index(ws, "enumerate styles of")?;
        Ok(match A::AXIS {
            Axis::Row => Box::new(ws.row_styles(index)?),
            Axis::Column => Box::new(ws.column_styles(index as u16)?),
        })
    }

    /// Standalone copy of this line's current size and style
    pub fn detach(&self, ws: &Worksheet) -> Result<Self> {
        Ok(Self {
            binding: Binding::Standalone {
                index: self.index(ws)?,
                size: self.size(ws)?,
                style: self.style(ws)?.clone(),
            },
            _axis: PhantomData,
        })
    }

    pub(crate) fn template_parts(&self, ws: &Worksheet) -> Result<(f64, Style)> {
        Ok((self.size(ws)?, self.style(ws)?.clone()))
    }

    fn bound_index(&self, ws: &Worksheet, action: &str) -> Result<u32> {
        match &self.binding {
            Binding::Standalone { .. } => Err(Error::invalid_state(format!(
                "cannot {} a standalone {}",
                action,
                A::AXIS.name()
            ))),
            Binding::Bound { sheet, id } => ws.resolve_line(A::AXIS, *sheet, *id),
        }
    }
}

fn ws_line_range(axis: Axis, index: u32) -> Result<CellRange> {
    match axis {
        Axis::Row => CellRange::full_row(index),
        Axis::Column => CellRange::full_column(index as u16),
    }
}

impl Line<RowAxis> {
    /// Row number (1-based)
    pub fn row_number(&self, ws: &Worksheet) -> Result<u32> {
        self.index(ws)
    }

    /// Row height in points
    pub fn height(&self, ws: &Worksheet) -> Result<f64> {
        self.size(ws)
    }

    /// Set row height in points
    pub fn set_height(&mut self, ws: &mut Worksheet, height: f64) -> Result<()> {
        self.set_size(ws, height)
    }

    /// Insert `count` rows above this one
    pub fn insert_rows_above(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        self.insert_before(ws, count)
    }

    /// Insert `count` rows below this one
    pub fn insert_rows_below(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        self.insert_after(ws, count)
    }
}

impl Line<ColumnAxis> {
    /// Column number (1-based, A = 1)
    pub fn column_number(&self, ws: &Worksheet) -> Result<u16> {
        self.index(ws).map(|i| i as u16)
    }

    /// Column width in characters
    pub fn width(&self, ws: &Worksheet) -> Result<f64> {
        self.size(ws)
    }

    /// Set column width in characters
    pub fn set_width(&mut self, ws: &mut Worksheet, width: f64) -> Result<()> {
        self.set_size(ws, width)
    }

    /// Insert `count` columns to the left of this one
    pub fn insert_columns_before(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        self.insert_before(ws, count)
    }

    /// Insert `count` columns to the right of this one
    pub fn insert_columns_after(&self, ws: &mut Worksheet, count: u32) -> Result<()> {
        self.insert_after(ws, count)
    }
}
