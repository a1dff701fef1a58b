//! Ranges that follow structural edits
//!
//! A range registered with [`Worksheet::anchor_range`](crate::Worksheet::anchor_range)
//! is adjusted on every insert and delete: it moves with the lines it covers,
//! widens when lines are inserted strictly inside it, shrinks when part of it
//! is deleted, and is dropped from the registry once every line it covered
//! is gone.

use std::collections::BTreeMap;

use crate::cell::CellRange;
use crate::shift::{Axis, ShiftEvent, Shiftable};

/// Key of an anchored range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeAnchor(u64);

/// Registry of anchored ranges owned by a worksheet
#[derive(Debug, Clone, Default)]
pub struct AnchoredRanges {
    next_id: u64,
    ranges: BTreeMap<RangeAnchor, CellRange>,
}

impl AnchoredRanges {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a range and return its key
    pub fn add(&mut self, range: CellRange) -> RangeAnchor {
        let anchor = RangeAnchor(self.next_id);
        self.next_id += 1;
        self.ranges.insert(anchor, range);
        anchor
    }

    /// Current extent of an anchored range; None if released or deleted away
    pub fn get(&self, anchor: RangeAnchor) -> Option<CellRange> {
        self.ranges.get(&anchor).copied()
    }

    /// Stop tracking a range. Returns false for unknown keys and for ranges
    /// a delete already dropped.
    pub fn release(&mut self, anchor: RangeAnchor) -> bool {
        self.ranges.remove(&anchor).is_some()
    }

    /// Number of live ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over every live range in registration order
    pub fn iter(&self) -> impl Iterator<Item = (RangeAnchor, CellRange)> + '_ {
        self.ranges.iter().map(|(&anchor, &range)| (anchor, range))
    }

    /// Highest index along `axis` that an insert would have to move.
    ///
    /// Ranges covering the whole axis never move. A range ending at the grid
    /// edge keeps that end on insert, so it counts by its start; every other
    /// range counts by its end.
    pub fn max_extent(&self, axis: Axis) -> Option<u32> {
        let edge = axis.max_index();
        self.ranges
            .values()
            .filter_map(|range| match range.span_on(axis) {
                (1, last) if last == edge => None,
                (first, last) if last == edge => Some(first),
                (_, last) => Some(last),
            })
            .max()
    }
}

impl Shiftable for AnchoredRanges {
    fn apply_shift(&mut self, axis: Axis, event: ShiftEvent) {
        let max = axis.max_index();
        self.ranges.retain(|anchor, range| {
            let (first, last) = range.span_on(axis);
            match event.map_span(first, last, max) {
                Some((first, last)) => {
                    *range = range.with_span(axis, first, last);
                    true
                }
                None => {
                    log::debug!("anchored range {:?} dropped by {:?}", anchor, event);
                    false
                }
            }
        });
    }
}
