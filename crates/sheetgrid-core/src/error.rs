//! Error types for sheetgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetgrid-core
///
/// Every operation validates its inputs before touching any state, so an
/// `Err` always means the worksheet is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (valid: 1..={1})")]
    RowOutOfBounds(u64, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (valid: 1..={1})")]
    ColumnOutOfBounds(u64, u16),

    /// Row height or column width that is not a positive number
    #[error("Invalid dimension: {0} (must be a positive number)")]
    InvalidDimension(f64),

    /// Bad argument to a structural operation (zero counts and the like)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle used after its line was deleted, or against a sheet it does not belong to
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An index would be placed or left outside the grid
    OutOfBounds,
    /// Malformed input
    InvalidArgument,
    /// The handle or sheet is no longer usable
    InvalidState,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RowOutOfBounds(..)
            | Error::ColumnOutOfBounds(..)
            | Error::SheetOutOfBounds(..) => ErrorKind::OutOfBounds,
            Error::InvalidAddress(_)
            | Error::InvalidRange(_)
            | Error::InvalidDimension(_)
            | Error::InvalidArgument(_)
            | Error::InvalidSheetName(_)
            | Error::DuplicateSheetName(_) => ErrorKind::InvalidArgument,
            Error::InvalidState(_) => ErrorKind::InvalidState,
        }
    }

    /// Create an invalid-argument error with a message
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create an invalid-state error with a message
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::RowOutOfBounds(0, 1_048_576).kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(
            Error::ColumnOutOfBounds(16_385, 16_384).kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(Error::InvalidDimension(-1.0).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            Error::invalid_argument("count must be positive").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::invalid_state("row was deleted").kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::RowOutOfBounds(0, 1_048_576).to_string(),
            "Row index 0 out of bounds (valid: 1..=1048576)"
        );
    }
}
