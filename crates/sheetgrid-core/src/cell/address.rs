//! Cell address and range types
//!
//! Rows and columns are 1-based everywhere: `A1` is `(1, 1)` and the last
//! cell of a sheet is `(MAX_ROWS, MAX_COLS)`. Both types can only be built
//! through validating constructors, so a live value is always in bounds.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::shift::Axis;
use crate::{MAX_COLS, MAX_ROWS};

/// Check that a row index lies in `1..=MAX_ROWS`
pub fn validate_row(row: u64) -> Result<u32> {
    if row == 0 || row > MAX_ROWS as u64 {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }
    Ok(row as u32)
}

/// Check that a column index lies in `1..=MAX_COLS`
pub fn validate_col(col: u64) -> Result<u16> {
    if col == 0 || col > MAX_COLS as u64 {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
    }
    Ok(col as u16)
}

/// A validated cell address (e.g., "C10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    row: u32,
    col: u16,
}

impl CellAddress {
    /// Create a new cell address, failing if either coordinate is outside the grid
    pub fn new(row: u32, col: u16) -> Result<Self> {
        let row = validate_row(row as u64)?;
        let col = validate_col(col as u64)?;
        Ok(Self { row, col })
    }

    /// Build an address from coordinates the caller has already validated
    pub(crate) const fn new_unchecked(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Row number (1-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column number (1-based, A = 1)
    pub fn col(&self) -> u16 {
        self.col
    }

    /// Index along the given axis
    pub fn index_on(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.row,
            Axis::Column => self.col as u32,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` markers are accepted and ignored.
    ///
    /// # Examples
    /// ```
    /// use sheetgrid_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!(addr.row(), 2);
    /// assert_eq!(addr.col(), 2);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let body = s.strip_prefix('$').unwrap_or(s);
        let split = body
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(body.len());
        let (letters, rest) = body.split_at(split);
        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        let col = Self::letters_to_column(letters)?;

        let digits = rest.strip_prefix('$').unwrap_or(rest);
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        let row = validate_row(row)?;

        Ok(Self { row, col })
    }

    /// Convert a column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32;

        while n > 0 {
            n -= 1;
            result.insert(0, ((n % 26) as u8 + b'A') as char);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a column number (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
            }
        }

        validate_col(col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A closed rectangular range of cells (e.g., "A1:B10")
///
/// Always normalized: `start` is the top-left corner and `end` the
/// bottom-right one. A single cell is a valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    /// Create a range spanning two corners, in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new_unchecked(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new_unchecked(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from row/column numbers
    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Result<Self> {
        Ok(Self::new(
            CellAddress::new(start_row, start_col)?,
            CellAddress::new(end_row, end_col)?,
        ))
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Range covering every column of one row
    pub fn full_row(row: u32) -> Result<Self> {
        Self::full_rows(row, row)
    }

    /// Range covering every row of one column
    pub fn full_column(col: u16) -> Result<Self> {
        Self::full_columns(col, col)
    }

    /// Range covering every column of the rows `first..=last`
    pub fn full_rows(first: u32, last: u32) -> Result<Self> {
        Self::from_indices(first, 1, last, MAX_COLS)
    }

    /// Range covering every row of the columns `first..=last`
    pub fn full_columns(first: u16, last: u16) -> Result<Self> {
        Self::from_indices(1, first, MAX_ROWS, last)
    }

    /// Parse a range from `A1:B10`, `C3`, `5:7` (rows) or `B:D` (columns)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let Some((left, right)) = s.split_once(':') else {
            return Ok(Self::single(CellAddress::parse(s)?));
        };
        let (left, right) = (left.trim_matches('$'), right.trim_matches('$'));

        if !left.is_empty() && left.bytes().all(|b| b.is_ascii_digit()) {
            let first = Self::parse_row_number(left, s)?;
            let last = Self::parse_row_number(right, s)?;
            return Self::full_rows(first, last);
        }
        if !left.is_empty() && left.bytes().all(|b| b.is_ascii_alphabetic()) {
            let first = CellAddress::letters_to_column(left)?;
            let last = CellAddress::letters_to_column(right)?;
            return Self::full_columns(first, last);
        }

        Ok(Self::new(CellAddress::parse(left)?, CellAddress::parse(right)?))
    }

    fn parse_row_number(part: &str, whole: &str) -> Result<u32> {
        let row: u64 = part
            .parse()
            .map_err(|_| Error::InvalidRange(format!("invalid row span '{}'", whole)))?;
        validate_row(row)
    }

    /// Top-left corner
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Get the intersection of two ranges, if any
    pub fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        if !self.overlaps(other) {
            return None;
        }

        Some(Self {
            start: CellAddress::new_unchecked(
                self.start.row.max(other.start.row),
                self.start.col.max(other.start.col),
            ),
            end: CellAddress::new_unchecked(
                self.end.row.min(other.end.row),
                self.end.col.min(other.end.col),
            ),
        })
    }

    /// Rows covered by this range
    pub fn row_span(&self) -> RangeInclusive<u32> {
        self.start.row..=self.end.row
    }

    /// Columns covered by this range
    pub fn column_span(&self) -> RangeInclusive<u16> {
        self.start.col..=self.end.col
    }

    /// First and last index along an axis
    pub fn span_on(&self, axis: Axis) -> (u32, u32) {
        (self.start.index_on(axis), self.end.index_on(axis))
    }

    /// Copy of this range with the span along `axis` replaced.
    ///
    /// Caller guarantees `1 <= first <= last <= axis max`.
    pub(crate) fn with_span(&self, axis: Axis, first: u32, last: u32) -> Self {
        match axis {
            Axis::Row => Self {
                start: CellAddress::new_unchecked(first, self.start.col),
                end: CellAddress::new_unchecked(last, self.end.col),
            },
            Axis::Column => Self {
                start: CellAddress::new_unchecked(self.start.row, first as u16),
                end: CellAddress::new_unchecked(self.end.row, last as u16),
            },
        }
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// True if the range spans every column (one or more whole rows)
    pub fn is_full_rows(&self) -> bool {
        self.start.col == 1 && self.end.col == MAX_COLS
    }

    /// True if the range spans every row (one or more whole columns)
    pub fn is_full_columns(&self) -> bool {
        self.start.row == 1 && self.end.row == MAX_ROWS
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
        }
    }

    /// Format as `A1:B10`; whole rows and columns use `5:7` and `B:D`
    pub fn to_a1_string(&self) -> String {
        if self.is_full_columns() && self.is_full_rows() {
            format!("1:{}", MAX_ROWS)
        } else if self.is_full_rows() {
            format!("{}:{}", self.start.row, self.end.row)
        } else if self.is_full_columns() {
            format!(
                "{}:{}",
                CellAddress::column_to_letters(self.start.col),
                CellAddress::column_to_letters(self.end.col)
            )
        } else if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u16,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row {
            return None;
        }

        let addr = CellAddress::new_unchecked(self.current_row, self.current_col);

        if self.current_col >= self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.current_col += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current_row > self.range.end.row {
            return (0, Some(0));
        }
        let width = self.range.col_count() as u64;
        let full_rows_left = (self.range.end.row - self.current_row) as u64;
        let in_current = (self.range.end.col - self.current_col) as u64 + 1;
        let remaining = (full_rows_left * width + in_current) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
