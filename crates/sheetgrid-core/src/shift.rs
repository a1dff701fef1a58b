//! Index shifting for structural edits
//!
//! Inserting or deleting rows/columns produces a [`ShiftEvent`] on one
//! [`Axis`]. The worksheet delivers each event exactly once to every
//! [`Shiftable`] part it owns (cell storage, the line collection of that
//! axis, anchored ranges) and appends it to a [`ShiftJournal`].
//!
//! Row and column handles never subscribe to anything: they hold a stable
//! line id and read their index from the line collection, so there is no
//! per-handle fan-out and nothing to unsubscribe.

use std::collections::BTreeMap;

use crate::cell::{validate_col, validate_row};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Rows (vertical position)
    Row,
    /// Columns (horizontal position)
    Column,
}

impl Axis {
    /// Largest valid index on this axis
    pub fn max_index(self) -> u32 {
        match self {
            Axis::Row => MAX_ROWS,
            Axis::Column => MAX_COLS as u32,
        }
    }

    /// Check that an index lies on this axis
    pub fn validate(self, index: u64) -> Result<u32> {
        match self {
            Axis::Row => validate_row(index),
            Axis::Column => validate_col(index).map(u32::from),
        }
    }

    /// Out-of-bounds error for `index` on this axis
    pub(crate) fn out_of_bounds(self, index: u64) -> Error {
        match self {
            Axis::Row => Error::RowOutOfBounds(index, MAX_ROWS),
            Axis::Column => Error::ColumnOutOfBounds(index, MAX_COLS),
        }
    }

    /// Lowercase name, for messages
    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// A structural change along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftEvent {
    /// `count` blank lines were inserted so that the first one is at `at`
    Inserted { at: u32, count: u32 },
    /// Lines `at..at + count` were removed
    Deleted { at: u32, count: u32 },
}

impl ShiftEvent {
    /// Where a line that was at `index` lives after this event.
    ///
    /// `None` means the line was deleted.
    pub fn map_index(&self, index: u32) -> Option<u32> {
        match *self {
            ShiftEvent::Inserted { at, count } => {
                if index >= at {
                    index.checked_add(count)
                } else {
                    Some(index)
                }
            }
            ShiftEvent::Deleted { at, count } => {
                if index < at {
                    Some(index)
                } else if index - at < count {
                    None
                } else {
                    Some(index - count)
                }
            }
        }
    }

    /// Map an inclusive span `first..=last` through this event.
    ///
    /// A span covering the whole axis is left alone. Otherwise inserting
    /// strictly inside a span widens it and inserting at or before its start
    /// moves it; an end already at `max` stays there. A span with any other bound
    /// pushed past `max` yields `None`; the worksheet refuses such inserts
    /// before they happen. Deleting part of a span shrinks it; deleting all
    /// of it yields `None`.
    pub fn map_span(&self, first: u32, last: u32, max: u32) -> Option<(u32, u32)> {
        if first == 1 && last == max {
            return Some((first, last));
        }
        match *self {
            ShiftEvent::Inserted { at, count } => {
                let shift = |index: u32| {
                    let moved = index as u64 + count as u64;
                    (moved <= max as u64).then_some(moved as u32)
                };
                let shift_last = |last: u32| if last == max { Some(max) } else { shift(last) };
                if first >= at {
                    Some((shift(first)?, shift_last(last)?))
                } else if last >= at {
                    Some((first, shift_last(last)?))
                } else {
                    Some((first, last))
                }
            }
            ShiftEvent::Deleted { at, count } => {
                let end = at as u64 + count as u64 - 1;
                let (first64, last64) = (first as u64, last as u64);
                if last < at {
                    Some((first, last))
                } else if first64 > end {
                    Some((first - count, last - count))
                } else if first >= at && last64 <= end {
                    None
                } else {
                    let new_first = first.min(at);
                    let new_last = if last64 > end { last - count } else { at - 1 };
                    Some((new_first, new_last))
                }
            }
        }
    }

    /// First index touched by this event
    pub fn at(&self) -> u32 {
        match *self {
            ShiftEvent::Inserted { at, .. } | ShiftEvent::Deleted { at, .. } => at,
        }
    }

    /// Number of lines inserted or deleted
    pub fn count(&self) -> u32 {
        match *self {
            ShiftEvent::Inserted { count, .. } | ShiftEvent::Deleted { count, .. } => count,
        }
    }
}

/// Integer key of an index-ordered map
pub(crate) trait IndexKey: Copy + Ord {
    fn to_index(self) -> u32;
    fn from_index(index: u32) -> Self;
}

impl IndexKey for u32 {
    fn to_index(self) -> u32 {
        self
    }

    fn from_index(index: u32) -> Self {
        index
    }
}

impl IndexKey for u16 {
    fn to_index(self) -> u32 {
        self as u32
    }

    fn from_index(index: u32) -> Self {
        index as u16
    }
}

/// Re-key an index-ordered map through `event`, returning the entries it deleted.
///
/// Only keys `>= event.at()` are visited.
pub(crate) fn shift_keys<K: IndexKey, V>(map: &mut BTreeMap<K, V>, event: ShiftEvent) -> Vec<V> {
    let tail = map.split_off(&K::from_index(event.at()));
    let mut removed = Vec::new();
    for (key, value) in tail {
        match event.map_index(key.to_index()) {
            Some(index) => {
                map.insert(K::from_index(index), value);
            }
            None => removed.push(value),
        }
    }
    removed
}

/// Anything whose stored indices must follow structural edits
pub trait Shiftable {
    /// Apply one event on `axis`. Parts that only track the other axis ignore it.
    fn apply_shift(&mut self, axis: Axis, event: ShiftEvent);
}

/// Deliver one event to every subscriber, in order
pub(crate) fn broadcast(subscribers: &mut [&mut dyn Shiftable], axis: Axis, event: ShiftEvent) {
    log::trace!(
        "broadcasting {:?} on {} axis to {} subscribers",
        event,
        axis.name(),
        subscribers.len()
    );
    for subscriber in subscribers.iter_mut() {
        subscriber.apply_shift(axis, event);
    }
}

/// Position in a [`ShiftJournal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftCursor(usize);

/// Cumulative log of every shift applied to a worksheet
///
/// Lets code that keeps plain indices outside the worksheet translate them
/// lazily: remember a cursor, and later replay the events recorded since.
/// The log grows with every edit until [`discard_before`](Self::discard_before)
/// drops the events no live cursor needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftJournal {
    /// Absolute position of `events[0]`
    base: usize,
    events: Vec<(Axis, ShiftEvent)>,
}

impl ShiftJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn record(&mut self, axis: Axis, event: ShiftEvent) {
        self.events.push((axis, event));
    }

    /// Cursor pointing past the latest event
    pub fn cursor(&self) -> ShiftCursor {
        ShiftCursor(self.base + self.events.len())
    }

    /// Events recorded after `cursor`.
    ///
    /// `None` if some of them were already discarded.
    pub fn since(&self, cursor: ShiftCursor) -> Option<&[(Axis, ShiftEvent)]> {
        let start = cursor.0.checked_sub(self.base)?;
        Some(self.events.get(start..).unwrap_or(&[]))
    }

    /// Translate an index observed at `cursor` to the current layout.
    ///
    /// Returns `None` if the line was deleted in the meantime, or if the
    /// cursor predates a [`discard_before`](Self::discard_before).
    pub fn rebase(&self, axis: Axis, index: u32, cursor: ShiftCursor) -> Option<u32> {
        self.since(cursor)?
            .iter()
            .filter(|(a, _)| *a == axis)
            .try_fold(index, |idx, (_, event)| event.map_index(idx))
    }

    /// Drop every event recorded before `cursor`. Cursors taken earlier can
    /// no longer be rebased; later ones are unaffected.
    pub fn discard_before(&mut self, cursor: ShiftCursor) {
        let upto = cursor.0.saturating_sub(self.base).min(self.events.len());
        self.events.drain(..upto);
        self.base += upto;
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no event is retained
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 100;

    #[test]
    fn test_insert_map_index() {
        let ev = ShiftEvent::Inserted { at: 5, count: 3 };
        assert_eq!(ev.map_index(4), Some(4));
        assert_eq!(ev.map_index(5), Some(8));
        assert_eq!(ev.map_index(10), Some(13));
    }

    #[test]
    fn test_delete_map_index() {
        let ev = ShiftEvent::Deleted { at: 5, count: 3 };
        assert_eq!(ev.map_index(4), Some(4));
        assert_eq!(ev.map_index(5), None);
        assert_eq!(ev.map_index(7), None);
        assert_eq!(ev.map_index(8), Some(5));
    }

    #[test]
    fn test_insert_map_span() {
        let ev = ShiftEvent::Inserted { at: 5, count: 2 };
        // entirely before
        assert_eq!(ev.map_span(1, 4, MAX), Some((1, 4)));
        // starts at insertion point: moves
        assert_eq!(ev.map_span(5, 6, MAX), Some((7, 8)));
        // crosses insertion point: widens
        assert_eq!(ev.map_span(3, 6, MAX), Some((3, 8)));
        // whole axis stays whole
        assert_eq!(ev.map_span(1, MAX, MAX), Some((1, MAX)));
        assert_eq!(
            ShiftEvent::Inserted { at: 1, count: 4 }.map_span(1, MAX, MAX),
            Some((1, MAX))
        );
        assert_eq!(ev.map_span(6, MAX, MAX), Some((8, MAX)));
        // pushed off the grid
        assert_eq!(ev.map_span(MAX, MAX, MAX), None);
        // an end short of the edge is never clamped
        assert_eq!(ev.map_span(3, MAX - 1, MAX), None);
        assert_eq!(ev.map_span(3, MAX - 2, MAX), Some((3, MAX)));
    }

    #[test]
    fn test_delete_map_span() {
        let ev = ShiftEvent::Deleted { at: 5, count: 3 }; // removes 5..=7
        assert_eq!(ev.map_span(1, 4, MAX), Some((1, 4)));
        assert_eq!(ev.map_span(8, 9, MAX), Some((5, 6)));
        assert_eq!(ev.map_span(5, 7, MAX), None);
        assert_eq!(ev.map_span(6, 6, MAX), None);
        assert_eq!(ev.map_span(3, 6, MAX), Some((3, 4)));
        assert_eq!(ev.map_span(6, 9, MAX), Some((5, 6)));
        assert_eq!(ev.map_span(2, 10, MAX), Some((2, 7)));
        assert_eq!(ev.map_span(1, MAX, MAX), Some((1, MAX)));
    }

    #[test]
    fn test_shift_keys() {
        let mut map = BTreeMap::from([(1u32, "a"), (5, "b"), (6, "c"), (9, "d")]);

        let removed = shift_keys(&mut map, ShiftEvent::Inserted { at: 5, count: 2 });
        assert!(removed.is_empty());
        assert_eq!(map, BTreeMap::from([(1, "a"), (7, "b"), (8, "c"), (11, "d")]));

        let removed = shift_keys(&mut map, ShiftEvent::Deleted { at: 7, count: 2 });
        assert_eq!(removed, vec!["b", "c"]);
        assert_eq!(map, BTreeMap::from([(1, "a"), (9, "d")]));
    }

    #[test]
    fn test_journal_rebase() {
        let mut journal = ShiftJournal::new();
        let start = journal.cursor();

        journal.record(Axis::Row, ShiftEvent::Inserted { at: 2, count: 4 });
        journal.record(Axis::Column, ShiftEvent::Deleted { at: 1, count: 1 });
        let mid = journal.cursor();
        journal.record(Axis::Row, ShiftEvent::Deleted { at: 1, count: 3 });

        assert_eq!(journal.len(), 3);
        assert_eq!(journal.rebase(Axis::Row, 10, start), Some(11));
        assert_eq!(journal.rebase(Axis::Row, 10, mid), Some(7));
        assert_eq!(journal.rebase(Axis::Row, 2, mid), None);
        assert_eq!(journal.rebase(Axis::Column, 3, start), Some(2));
        assert_eq!(journal.rebase(Axis::Column, 1, start), None);
        assert_eq!(journal.since(journal.cursor()), Some(&[][..]));
    }

    #[test]
    fn test_journal_discard_before() {
        let mut journal = ShiftJournal::new();
        let start = journal.cursor();
        journal.record(Axis::Row, ShiftEvent::Inserted { at: 1, count: 2 });
        let mid = journal.cursor();
        journal.record(Axis::Row, ShiftEvent::Inserted { at: 1, count: 3 });

        journal.discard_before(mid);
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.rebase(Axis::Row, 4, mid), Some(7));
        assert_eq!(journal.rebase(Axis::Row, 4, start), None);
        assert!(journal.since(start).is_none());

        // cursors stay absolute across discards
        let end = journal.cursor();
        journal.discard_before(end);
        assert!(journal.is_empty());
        assert_eq!(journal.cursor(), end);
        assert_eq!(journal.rebase(Axis::Row, 4, end), Some(4));
    }
}
