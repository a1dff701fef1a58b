//! Workbook type - owner of worksheets

use crate::config::WorkbookSettings;
use crate::error::{Error, Result};
use crate::style::Style;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// Every worksheet it creates starts from the workbook's
/// [`SheetDefaults`](crate::SheetDefaults), including the default style at
/// the bottom of the style cascade.
#[derive(Debug)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
    /// Workbook settings
    settings: WorkbookSettings,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.worksheets.push(Worksheet::new("Sheet1"));
        wb
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            settings: WorkbookSettings::default(),
        }
    }

    /// Create an empty workbook with custom settings
    pub fn with_settings(settings: WorkbookSettings) -> Result<Self> {
        settings.defaults.validate()?;
        Ok(Self {
            worksheets: Vec::new(),
            settings,
        })
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name (case-insensitive)
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.worksheets[i])
    }

    /// Get a mutable worksheet by name (case-insensitive)
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let index = self.sheet_index(name)?;
        self.worksheets.get_mut(index)
    }

    /// Find a worksheet's index by name (case-insensitive)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.worksheets
            .iter()
            .position(|ws| ws.name().to_lowercase() == lower)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with a generated name
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a new worksheet with the given name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name, None)?;

        let worksheet = Worksheet::with_defaults(name, self.settings.defaults.clone())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        log::debug!("added worksheet '{}' at {}", name, index);
        Ok(index)
    }

    /// Remove a worksheet, handing it back to the caller.
    ///
    /// Handles created from it keep working against the returned sheet;
    /// once it is dropped there is nothing left for them to resolve.
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        let worksheet = self.worksheets.remove(index);
        log::debug!("removed worksheet '{}'", worksheet.name());
        Ok(worksheet)
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(new_name, Some(index))?;
        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    /// Get workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    /// Default style handed to new worksheets
    pub fn default_style(&self) -> &Style {
        &self.settings.defaults.style
    }

    /// Validate a sheet name, optionally excluding one sheet from the duplicate check
    fn validate_sheet_name(&self, name: &str, exclude_index: Option<usize>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        match self.sheet_index(name) {
            Some(i) if Some(i) != exclude_index => Err(Error::DuplicateSheetName(name.into())),
            _ => Ok(()),
        }
    }

    /// Generate a unique sheet name
    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.sheet_index(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetDefaults;
    use crate::ErrorKind;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();

        let idx = wb.add_worksheet().unwrap();
        assert_eq!(idx, 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet2");

        let idx = wb.add_worksheet_with_name("Data").unwrap();
        assert_eq!(idx, 2);
        assert!(wb.worksheet_by_name("data").is_some());
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        assert_eq!(
            wb.add_worksheet_with_name("SHEET1"),
            Err(Error::DuplicateSheetName("SHEET1".into()))
        );
        wb.rename_worksheet(0, "sheet1").unwrap();
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();

        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());

        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet_with_name(&long_name).is_err());
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_sheets_inherit_workbook_defaults() {
        let mut settings = WorkbookSettings::default();
        settings.defaults = SheetDefaults::default()
            .with_row_height(18.0)
            .with_style(Style::new().font_size(10.0));
        let mut wb = Workbook::with_settings(settings).unwrap();
        assert!(wb.is_empty());

        let idx = wb.add_worksheet().unwrap();
        let ws = wb.worksheet(idx).unwrap();
        assert_eq!(ws.row_height(1).unwrap(), 18.0);
        assert_eq!(ws.cell_style("A1").unwrap().font.size, 10.0);
        assert_eq!(wb.default_style().font.size, 10.0);
    }

    #[test]
    fn test_removed_sheet_handles() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Other").unwrap();

        let row = wb.worksheet_mut(0).unwrap().row(3).unwrap();
        let removed = wb.remove_worksheet(0).unwrap();
        assert_eq!(row.row_number(&removed).unwrap(), 3);

        // the sheet now at index 0 is a different one
        let other = wb.worksheet(0).unwrap();
        assert_eq!(row.height(other).unwrap_err().kind(), ErrorKind::InvalidState);
        assert!(wb.remove_worksheet(5).is_err());
    }
}
