use super::backend::SheetBackend;
use crate::error::{RobologError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory workbook for testing.
///
/// Uses `RefCell` for interior mutability since robolog is single-threaded.
/// This keeps the `SheetBackend` trait on `&self` for every method.
///
/// Besides plain storage it can simulate the backend failures the upper layers
/// must cope with: rate limiting on reads and write errors, either globally or
/// for a single worksheet.
#[derive(Default)]
pub struct MemBackend {
    sheets: RefCell<Vec<(String, Vec<Vec<String>>)>>,
    reads: RefCell<HashMap<String, usize>>,
    rate_limited_reads: Cell<usize>,
    fail_reads: RefCell<Option<String>>,
    simulate_write_error: Cell<bool>,
    failing_sheet: RefCell<Option<String>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` full-sheet reads fail with a rate-limit error.
    pub fn set_rate_limited_reads(&self, count: usize) {
        self.rate_limited_reads.set(count);
    }

    /// Make every full-sheet read fail with a non-transient backend error.
    pub fn set_read_failure(&self, message: Option<&str>) {
        *self.fail_reads.borrow_mut() = message.map(str::to_string);
    }

    /// Enable write error simulation for every worksheet.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Fail writes to one worksheet only. `None` clears it.
    pub fn set_failing_sheet(&self, sheet: Option<&str>) {
        *self.failing_sheet.borrow_mut() = sheet.map(str::to_string);
    }

    /// Number of full-sheet reads served so far for a worksheet.
    pub fn reads(&self, sheet: &str) -> usize {
        self.reads.borrow().get(sheet).copied().unwrap_or(0)
    }

    /// Replace (or create) a worksheet with raw rows, header first.
    pub fn seed(&self, sheet: &str, rows: Vec<Vec<String>>) {
        let mut sheets = self.sheets.borrow_mut();
        match sheets.iter_mut().find(|(name, _)| name == sheet) {
            Some(entry) => entry.1 = rows,
            None => sheets.push((sheet.to_string(), rows)),
        }
    }

    /// Raw rows of a worksheet, header included. Test inspection helper.
    pub fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets
            .borrow()
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    fn check_write(&self, sheet: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(RobologError::Backend("Simulated write error".to_string()));
        }
        if self.failing_sheet.borrow().as_deref() == Some(sheet) {
            return Err(RobologError::Backend(format!(
                "Simulated write error on '{}'",
                sheet
            )));
        }
        Ok(())
    }

    fn with_sheet<T>(&self, sheet: &str, f: impl FnOnce(&mut Vec<Vec<String>>) -> T) -> Result<T> {
        let mut sheets = self.sheets.borrow_mut();
        let rows = sheets
            .iter_mut()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows)
            .ok_or_else(|| RobologError::WorksheetNotFound(sheet.to_string()))?;
        Ok(f(rows))
    }
}

impl SheetBackend for MemBackend {
    fn worksheet_names(&self) -> Result<Vec<String>> {
        Ok(self
            .sheets
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn add_worksheet(&self, sheet: &str, header: &[String]) -> Result<()> {
        self.check_write(sheet)?;
        if self.has_worksheet(sheet)? {
            return Err(RobologError::Backend(format!(
                "Worksheet '{}' already exists",
                sheet
            )));
        }
        self.sheets
            .borrow_mut()
            .push((sheet.to_string(), vec![header.to_vec()]));
        Ok(())
    }

    fn row_values(&self, sheet: &str, row: usize) -> Result<Vec<String>> {
        self.with_sheet(sheet, |rows| {
            row.checked_sub(1)
                .and_then(|i| rows.get(i))
                .cloned()
                .unwrap_or_default()
        })
    }

    fn all_values(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        if let Some(message) = self.fail_reads.borrow().as_ref() {
            return Err(RobologError::Backend(message.clone()));
        }
        let pending = self.rate_limited_reads.get();
        if pending > 0 {
            self.rate_limited_reads.set(pending - 1);
            return Err(RobologError::RateLimited(
                "429 RESOURCE_EXHAUSTED: read requests per minute".to_string(),
            ));
        }
        let rows = self.with_sheet(sheet, |rows| rows.clone())?;
        *self.reads.borrow_mut().entry(sheet.to_string()).or_insert(0) += 1;
        Ok(rows)
    }

    fn append_row(&self, sheet: &str, values: &[String]) -> Result<()> {
        self.check_write(sheet)?;
        self.with_sheet(sheet, |rows| rows.push(values.to_vec()))
    }

    fn update_cell(&self, sheet: &str, row: usize, col: usize, value: &str) -> Result<()> {
        self.check_write(sheet)?;
        if row == 0 || col == 0 {
            return Err(RobologError::Backend(format!(
                "Invalid cell address R{}C{}",
                row, col
            )));
        }
        self.with_sheet(sheet, |rows| {
            if rows.len() < row {
                rows.resize(row, Vec::new());
            }
            let cells = &mut rows[row - 1];
            if cells.len() < col {
                cells.resize(col, String::new());
            }
            cells[col - 1] = value.to_string();
        })
    }

    fn delete_row(&self, sheet: &str, row: usize) -> Result<()> {
        self.check_write(sheet)?;
        self.with_sheet(sheet, |rows| {
            if row >= 1 && row <= rows.len() {
                rows.remove(row - 1);
                true
            } else {
                false
            }
        })?
        .then_some(())
        .ok_or_else(|| RobologError::Backend(format!("Row {} is out of range in '{}'", row, sheet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_worksheet_is_reported() {
        let backend = MemBackend::new();
        let err = backend.all_values("Robot Log").unwrap_err();
        assert!(matches!(err, RobologError::WorksheetNotFound(name) if name == "Robot Log"));
    }

    #[test]
    fn update_cell_extends_short_rows() {
        let backend = MemBackend::new();
        backend
            .add_worksheet("Sheet", &strings(&["A", "B", "C"]))
            .unwrap();
        backend.append_row("Sheet", &strings(&["1"])).unwrap();
        backend.update_cell("Sheet", 2, 3, "x").unwrap();
        assert_eq!(backend.rows("Sheet")[1], strings(&["1", "", "x"]));
    }

    #[test]
    fn rate_limit_budget_is_consumed_per_read() {
        let backend = MemBackend::new();
        backend.add_worksheet("Sheet", &strings(&["A"])).unwrap();
        backend.set_rate_limited_reads(2);
        assert!(backend.all_values("Sheet").unwrap_err().is_rate_limited());
        assert!(backend.all_values("Sheet").unwrap_err().is_rate_limited());
        assert!(backend.all_values("Sheet").is_ok());
        assert_eq!(backend.reads("Sheet"), 1);
    }

    #[test]
    fn failing_sheet_only_blocks_that_sheet() {
        let backend = MemBackend::new();
        backend.add_worksheet("A", &strings(&["x"])).unwrap();
        backend.add_worksheet("B", &strings(&["x"])).unwrap();
        backend.set_failing_sheet(Some("A"));
        assert!(backend.append_row("A", &strings(&["1"])).is_err());
        assert!(backend.append_row("B", &strings(&["1"])).is_ok());
    }

    #[test]
    fn delete_row_out_of_range_fails() {
        let backend = MemBackend::new();
        backend.add_worksheet("Sheet", &strings(&["A"])).unwrap();
        assert!(backend.delete_row("Sheet", 5).is_err());
    }
}
