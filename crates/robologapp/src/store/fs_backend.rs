use super::backend::SheetBackend;
use crate::error::{RobologError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SHEET_EXT: &str = "csv";

/// Workbook stored as a directory of CSV files, one file per worksheet.
///
/// ```text
/// workbook/
/// ├── credentials.json                          # Service identity
/// ├── robolog.toml                              # Optional config overrides
/// ├── Robot Log.csv
/// ├── Client Log.csv
/// ├── Maintenance and troubleshooting log.csv
/// └── Robot Model.csv
/// ```
///
/// Every mutation rewrites the whole file through a temp file and a rename, so a
/// crash never leaves a half-written sheet behind.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.root.join(format!("{}.{}", sheet, SHEET_EXT))
    }

    fn existing_sheet_path(&self, sheet: &str) -> Result<PathBuf> {
        let path = self.sheet_path(sheet);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RobologError::WorksheetNotFound(sheet.to_string()))
        }
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let path = self.existing_sheet_path(sheet)?;
        debug!("reading worksheet {}", path.display());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn write_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let target = self.sheet_path(sheet);
        let tmp = self.root.join(format!(".sheet-{}.tmp", Uuid::new_v4()));
        let written = Self::write_csv(&tmp, rows)
            .and_then(|()| fs::rename(&tmp, &target).map_err(RobologError::from));
        if written.is_err() && tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                debug!("could not remove {}: {}", tmp.display(), e);
            }
        }
        written
    }

    fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)?;
        for row in rows {
            // A zero-field record would be written as a blank line, which
            // readers skip, shifting every row below it.
            if row.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl SheetBackend for FsBackend {
    fn worksheet_names(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SHEET_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn has_worksheet(&self, sheet: &str) -> Result<bool> {
        Ok(self.sheet_path(sheet).is_file())
    }

    fn add_worksheet(&self, sheet: &str, header: &[String]) -> Result<()> {
        if self.has_worksheet(sheet)? {
            return Err(RobologError::Backend(format!(
                "Worksheet '{}' already exists",
                sheet
            )));
        }
        self.write_rows(sheet, &[header.to_vec()])
    }

    fn row_values(&self, sheet: &str, row: usize) -> Result<Vec<String>> {
        let rows = self.read_rows(sheet)?;
        Ok(row
            .checked_sub(1)
            .and_then(|i| rows.into_iter().nth(i))
            .unwrap_or_default())
    }

    fn all_values(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.read_rows(sheet)
    }

    fn append_row(&self, sheet: &str, values: &[String]) -> Result<()> {
        let mut rows = self.read_rows(sheet)?;
        rows.push(values.to_vec());
        self.write_rows(sheet, &rows)
    }

    fn update_cell(&self, sheet: &str, row: usize, col: usize, value: &str) -> Result<()> {
        if row == 0 || col == 0 {
            return Err(RobologError::Backend(format!(
                "Invalid cell address R{}C{}",
                row, col
            )));
        }
        let mut rows = self.read_rows(sheet)?;
        if rows.len() < row {
            rows.resize(row, Vec::new());
        }
        let cells = &mut rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        self.write_rows(sheet, &rows)
    }

    fn delete_row(&self, sheet: &str, row: usize) -> Result<()> {
        let mut rows = self.read_rows(sheet)?;
        if row == 0 || row > rows.len() {
            return Err(RobologError::Backend(format!(
                "Row {} is out of range in '{}'",
                row, sheet
            )));
        }
        rows.remove(row - 1);
        self.write_rows(sheet, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().to_path_buf());
        // A directory squatting on the sheet path makes the final rename fail.
        fs::create_dir(dir.path().join("Robot Log.csv")).unwrap();

        let rows = vec![vec!["Serial Number".to_string()]];
        assert!(backend.write_rows("Robot Log", &rows).is_err());

        let leftovers: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["Robot Log.csv"]);
    }
}
