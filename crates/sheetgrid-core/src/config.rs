//! Sheet and workbook defaults

use crate::error::{Error, Result};
use crate::style::Style;

/// Default row height in points
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Default column width in characters
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Values a worksheet falls back to for lines and cells without their own
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetDefaults {
    /// Height of rows that were never sized
    pub row_height: f64,
    /// Width of columns that were never sized
    pub column_width: f64,
    /// Workbook default style, the last step of the style cascade
    #[cfg_attr(feature = "serde", serde(skip))]
    pub style: Style,
}

impl SheetDefaults {
    /// Set the default row height
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Set the default column width
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// Set the workbook default style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Check that both dimensions are positive
    pub fn validate(&self) -> Result<()> {
        for size in [self.row_height, self.column_width] {
            if !(size.is_finite() && size > 0.0) {
                return Err(Error::InvalidDimension(size));
            }
        }
        Ok(())
    }
}

impl Default for SheetDefaults {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            column_width: DEFAULT_COLUMN_WIDTH,
            style: Style::default(),
        }
    }
}

/// Workbook-level settings
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookSettings {
    /// Defaults handed to every worksheet the workbook creates
    pub defaults: SheetDefaults,
}
