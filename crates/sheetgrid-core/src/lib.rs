//! # sheetgrid-core
//!
//! Structural model of a spreadsheet worksheet: a sparse cell grid, row and
//! column lines that carry height/width and style, and the edits that move
//! them around.
//!
//! - [`CellAddress`] and [`CellRange`] - 1-based addressing and ranges
//! - [`Worksheet`] - cells, lines, the style cascade and structural edits
//! - [`Row`] and [`Column`] - handles that keep pointing at the same line
//!   while rows and columns are inserted or deleted around it
//! - [`Style`] / [`StylePool`] - immutable, interned formatting records
//! - [`Workbook`] - named worksheets sharing one set of defaults
//!
//! ## Example
//!
//! ```rust
//! use sheetgrid_core::{Color, Style, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("C10", "total").unwrap();
//! let row = sheet.row(10).unwrap();
//!
//! // Three rows above row 5 push row 10 down to 13
//! sheet.insert_rows_above(5, 3).unwrap();
//! assert_eq!(row.row_number(sheet).unwrap(), 13);
//! assert_eq!(sheet.get_value("C13").unwrap().as_text(), Some("total"));
//!
//! // Row styles apply to every cell without their own override
//! sheet.set_row_style(13, Style::new().fill_color(Color::YELLOW)).unwrap();
//! assert_eq!(sheet.cell_style("Z13").unwrap().fill, Some(Color::YELLOW));
//! ```

pub mod anchor;
pub mod cell;
pub mod config;
pub mod error;
pub mod line;
pub mod range;
pub mod shift;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use anchor::RangeAnchor;
pub use cell::{CellAddress, CellData, CellRange, CellValue};
pub use config::{SheetDefaults, WorkbookSettings};
pub use error::{Error, ErrorKind, Result};
pub use line::{Column, LineState, Row};
pub use range::{Range, RangeCell, RangeMut};
pub use shift::{Axis, ShiftCursor, ShiftEvent};
pub use workbook::Workbook;
pub use worksheet::{SheetId, SheetSnapshot, Worksheet};

pub use style::{
    Alignment, Color, FontStyle, HorizontalAlignment, NumberFormat, Style, StyleId, StylePool,
    VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
