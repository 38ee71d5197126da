use crate::error::Result;

/// Abstract interface for raw worksheet I/O.
///
/// This trait handles the "how" of storage (remote workbook, CSV files, memory),
/// while [`super::SheetStore`] handles the "what": header resolution, key lookup
/// and row addressing. Rows and columns are 1-based, as in any spreadsheet.
/// Row 1 is the header row.
pub trait SheetBackend {
    /// Titles of all worksheets in the workbook.
    fn worksheet_names(&self) -> Result<Vec<String>>;

    /// Whether a worksheet with this exact title exists.
    fn has_worksheet(&self, sheet: &str) -> Result<bool> {
        Ok(self.worksheet_names()?.iter().any(|name| name == sheet))
    }

    /// Create a worksheet holding only the given header row.
    fn add_worksheet(&self, sheet: &str, header: &[String]) -> Result<()>;

    /// Values of a single row. Returns an empty vector past the last row.
    fn row_values(&self, sheet: &str, row: usize) -> Result<Vec<String>>;

    /// Every row of the sheet, header included.
    fn all_values(&self, sheet: &str) -> Result<Vec<Vec<String>>>;

    /// Append a row after the last one.
    fn append_row(&self, sheet: &str, values: &[String]) -> Result<()>;

    /// Overwrite a single cell.
    fn update_cell(&self, sheet: &str, row: usize, col: usize, value: &str) -> Result<()>;

    /// Remove a row, shifting the rows below it up by one.
    fn delete_row(&self, sheet: &str, row: usize) -> Result<()>;
}
