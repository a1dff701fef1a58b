//! Cell styling types
//!
//! - [`Style`] - a complete formatting record
//! - [`StylePool`] / [`StyleId`] - interned, shared style values
//!
//! A [`Style`] stored in a pool is never mutated. Giving a cell, row or
//! column a different look always means interning a new value and rebinding
//! the entity's [`StyleId`], so two entities that share an id can never
//! drift apart.

mod alignment;
mod color;
mod font;
mod number_format;
mod pool;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use color::Color;
pub use font::FontStyle;
pub use number_format::NumberFormat;
pub use pool::{StyleId, StylePool};

/// Complete cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Solid background fill (None = no fill)
    pub fill: Option<Color>,
    /// Number format
    pub number_format: NumberFormat,
    /// Text alignment
    pub alignment: Alignment,
    /// Cell is locked when the sheet is protected
    pub locked: bool,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set a solid fill color
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Set number format
    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment.horizontal = align;
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment.vertical = align;
        self
    }

    /// Enable text wrapping
    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.alignment.wrap_text = wrap;
        self
    }

    /// Set the locked flag
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}
