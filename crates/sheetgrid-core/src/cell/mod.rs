//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10", "5:7")
//! - [`CellData`] / [`CellStorage`] - Materialized cells and their sparse store

mod address;
mod storage;
mod value;

pub use address::{validate_col, validate_row, CellAddress, CellRange, CellRangeIterator};
pub use storage::{CellData, CellStorage};
pub use value::CellValue;
