use super::fs_backend::FsBackend;
use super::sheet_store::SheetStore;
use super::RecordStore;
use crate::error::Result;
use crate::model::Sheet;
use std::path::{Path, PathBuf};

pub type FileStore = SheetStore<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        SheetStore::with_backend(FsBackend::new(root))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }

    /// Worksheets the app depends on that are missing from the workbook directory.
    pub fn missing_sheets(&self) -> Result<Vec<Sheet>> {
        let names = self.sheet_names()?;
        Ok(Sheet::ALL
            .into_iter()
            .filter(|sheet| !names.iter().any(|n| n == sheet.name()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::columns;
    use crate::record::Cells;
    use tempfile::tempdir;

    #[test]
    fn missing_sheets_lists_what_init_would_create() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.missing_sheets().unwrap().len(), 4);

        store
            .ensure_sheet(Sheet::RobotLog.name(), Sheet::RobotLog.default_headers())
            .unwrap();
        let missing = store.missing_sheets().unwrap();
        assert_eq!(missing.len(), 3);
        assert!(!missing.contains(&Sheet::RobotLog));
    }

    #[test]
    fn rows_survive_a_new_store_handle() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store
            .ensure_sheet(Sheet::RobotLog.name(), Sheet::RobotLog.default_headers())
            .unwrap();
        store
            .append(
                Sheet::RobotLog.name(),
                &Cells::new()
                    .with(columns::SERIAL_NUMBER, "SN001")
                    .with(columns::MAC_ADDRESS, "00:1B:44:11:3A:B7"),
            )
            .unwrap();

        let reopened = FileStore::new(dir.path().to_path_buf());
        let robot = reopened
            .find_by_key(Sheet::RobotLog.name(), columns::SERIAL_NUMBER, "sn001")
            .unwrap()
            .unwrap();
        assert_eq!(robot.get(columns::MAC_ADDRESS), "00:1B:44:11:3A:B7");
        assert_eq!(reopened.root(), dir.path());
    }
}
