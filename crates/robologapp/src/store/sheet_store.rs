use super::backend::SheetBackend;
use super::RecordStore;
use crate::error::{RobologError, Result};
use crate::model::same_key;
use crate::record::{sheet_row, Cells, Record, Schema, Table, HEADER_OFFSET};
use log::{debug, info};
use std::sync::Arc;

/// Record store adapter over a raw worksheet backend.
///
/// Resolves header rows, lays out positional rows, and addresses rows by key or
/// by record index. Holds no state besides the backend handle.
pub struct SheetStore<B: SheetBackend> {
    /// The underlying worksheet backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: SheetBackend> SheetStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn header(&self, sheet: &str) -> Result<Schema> {
        if !self.backend.has_worksheet(sheet)? {
            return Err(RobologError::WorksheetNotFound(sheet.to_string()));
        }
        Ok(Schema::new(self.backend.row_values(sheet, 1)?))
    }

    fn key_column(schema: &Schema, sheet: &str, key_column: &str) -> Result<usize> {
        schema
            .find_column(key_column)
            .ok_or_else(|| RobologError::ColumnNotFound {
                sheet: sheet.to_string(),
                column: key_column.to_string(),
            })
    }

    /// Locate the 1-based sheet row whose key cell matches, scanning top to bottom.
    fn locate(&self, sheet: &str, key_column: &str, key: &str) -> Result<Option<(usize, Vec<String>, Schema)>> {
        let mut rows = self.backend.all_values(sheet)?;
        if rows.is_empty() {
            return Err(RobologError::ColumnNotFound {
                sheet: sheet.to_string(),
                column: key_column.to_string(),
            });
        }
        let schema = Schema::new(rows.remove(0));
        let col = Self::key_column(&schema, sheet, key_column)?;

        let found = rows.into_iter().enumerate().find(|(_, row)| {
            row.get(col)
                .map(|cell| same_key(cell, key))
                .unwrap_or(false)
        });
        Ok(found.map(|(i, row)| (sheet_row(i), row, schema)))
    }

    /// Rewrite the named cells of one physical row. Header matching is loose.
    fn write_cells(&self, sheet: &str, schema: &Schema, row: usize, cells: &Cells) -> Result<()> {
        for (column, value) in cells.iter() {
            if let Some(pos) = schema.find_column(column) {
                self.backend.update_cell(sheet, row, pos + 1, value)?;
            } else {
                debug!("{}: ignoring unknown column '{}'", sheet, column);
            }
        }
        Ok(())
    }
}

impl<B: SheetBackend> RecordStore for SheetStore<B> {
    fn sheet_names(&self) -> Result<Vec<String>> {
        self.backend.worksheet_names()
    }

    fn ensure_sheet(&mut self, sheet: &str, header: &[&str]) -> Result<bool> {
        if self.backend.has_worksheet(sheet)? {
            return Ok(false);
        }
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        self.backend.add_worksheet(sheet, &header)?;
        info!("created worksheet '{}'", sheet);
        Ok(true)
    }

    fn fetch_all(&self, sheet: &str) -> Result<Table> {
        debug!("fetching '{}' from backend", sheet);
        let rows = self.backend.all_values(sheet)?;
        Ok(Table::from_values(sheet, rows))
    }

    fn append(&mut self, sheet: &str, cells: &Cells) -> Result<()> {
        let schema = self.header(sheet)?;
        let row = cells.to_row(&schema);
        self.backend.append_row(sheet, &row)?;
        info!("appended row to '{}'", sheet);
        Ok(())
    }

    fn find_by_key(&self, sheet: &str, key_column: &str, key: &str) -> Result<Option<Record>> {
        Ok(self
            .locate(sheet, key_column, key)?
            .map(|(row, values, schema)| Record::new(Arc::new(schema), values, row - HEADER_OFFSET)))
    }

    fn update_by_key(&mut self, sheet: &str, key_column: &str, key: &str, cells: &Cells) -> Result<bool> {
        match self.locate(sheet, key_column, key)? {
            Some((row, _, schema)) => {
                self.write_cells(sheet, &schema, row, cells)?;
                info!("updated '{}' row {} ({} = {})", sheet, row, key_column, key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_row(&mut self, sheet: &str, index: usize, cells: &Cells) -> Result<()> {
        let table = self.fetch_all(sheet)?;
        if index >= table.len() {
            return Err(RobologError::RowNotFound {
                sheet: sheet.to_string(),
                row: index + 1,
            });
        }
        self.write_cells(sheet, table.schema(), sheet_row(index), cells)?;
        info!("updated '{}' row {}", sheet, sheet_row(index));
        Ok(())
    }

    fn delete_by_key(&mut self, sheet: &str, key_column: &str, key: &str) -> Result<bool> {
        match self.locate(sheet, key_column, key)? {
            Some((row, _, _)) => {
                self.backend.delete_row(sheet, row)?;
                info!("deleted '{}' row {} ({} = {})", sheet, row, key_column, key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_row(&mut self, sheet: &str, index: usize) -> Result<()> {
        if !self.backend.has_worksheet(sheet)? {
            return Err(RobologError::WorksheetNotFound(sheet.to_string()));
        }
        let rows = self.backend.all_values(sheet)?;
        if sheet_row(index) > rows.len() {
            return Err(RobologError::RowNotFound {
                sheet: sheet.to_string(),
                row: index + 1,
            });
        }
        self.backend.delete_row(sheet, sheet_row(index))?;
        info!("deleted '{}' row {}", sheet, sheet_row(index));
        Ok(())
    }

    fn set_where(
        &mut self,
        sheet: &str,
        key_column: &str,
        key: &str,
        column: &str,
        value: &str,
    ) -> Result<usize> {
        let mut rows = self.backend.all_values(sheet)?;
        if rows.is_empty() {
            return Err(RobologError::ColumnNotFound {
                sheet: sheet.to_string(),
                column: key_column.to_string(),
            });
        }
        let schema = Schema::new(rows.remove(0));
        let key_col = Self::key_column(&schema, sheet, key_column)?;
        let target_col = Self::key_column(&schema, sheet, column)?;

        let mut touched = 0;
        for (i, row) in rows.iter().enumerate() {
            let matches = row
                .get(key_col)
                .map(|cell| same_key(cell, key))
                .unwrap_or(false);
            if matches {
                self.backend
                    .update_cell(sheet, sheet_row(i), target_col + 1, value)?;
                touched += 1;
            }
        }
        info!(
            "set {} = {} on {} '{}' row(s) where {} = {}",
            column, value, touched, sheet, key_column, key
        );
        Ok(touched)
    }
}
