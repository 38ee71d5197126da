//! The workbook client handle.
//!
//! A [`Workbook`] pairs a record store with its read cache. It is built once at
//! startup and passed by `&mut` to every command; nothing in the library reaches
//! the backend any other way.
//!
//! Reads that feed listings and uniqueness scans go through [`Workbook::fetch`]
//! (cached). Point lookups that guard a write use [`Workbook::find`], which always
//! hits the store. Every mutation clears the whole cache afterwards, whether it
//! succeeded or not, since a failed multi-cell write may still have landed in part.

use crate::cache::ReadCache;
use crate::error::Result;
use crate::model::Sheet;
use crate::record::{Cells, Record, Table};
use crate::store::RecordStore;

pub struct Workbook<S: RecordStore> {
    store: S,
    cache: ReadCache,
}

impl<S: RecordStore> Workbook<S> {
    pub fn new(store: S, cache: ReadCache) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }

    /// Cached full read of a sheet.
    pub fn fetch(&mut self, sheet: Sheet) -> Result<Table> {
        self.cache.fetch(&self.store, sheet.name())
    }

    /// Uncached point lookup by key.
    pub fn find(&self, sheet: Sheet, key_column: &str, key: &str) -> Result<Option<Record>> {
        self.store.find_by_key(sheet.name(), key_column, key)
    }

    pub fn append(&mut self, sheet: Sheet, cells: &Cells) -> Result<()> {
        let result = self.store.append(sheet.name(), cells);
        self.invalidate();
        result
    }

    pub fn update_by_key(
        &mut self,
        sheet: Sheet,
        key_column: &str,
        key: &str,
        cells: &Cells,
    ) -> Result<bool> {
        let result = self.store.update_by_key(sheet.name(), key_column, key, cells);
        self.invalidate();
        result
    }

    pub fn update_row(&mut self, sheet: Sheet, index: usize, cells: &Cells) -> Result<()> {
        let result = self.store.update_row(sheet.name(), index, cells);
        self.invalidate();
        result
    }

    pub fn delete_by_key(&mut self, sheet: Sheet, key_column: &str, key: &str) -> Result<bool> {
        let result = self.store.delete_by_key(sheet.name(), key_column, key);
        self.invalidate();
        result
    }

    pub fn delete_row(&mut self, sheet: Sheet, index: usize) -> Result<()> {
        let result = self.store.delete_row(sheet.name(), index);
        self.invalidate();
        result
    }

    pub fn set_where(
        &mut self,
        sheet: Sheet,
        key_column: &str,
        key: &str,
        column: &str,
        value: &str,
    ) -> Result<usize> {
        let result = self
            .store
            .set_where(sheet.name(), key_column, key, column, value);
        self.invalidate();
        result
    }

    /// Create any of the four sheets that are missing. Returns the ones created.
    pub fn ensure_sheets(&mut self) -> Result<Vec<Sheet>> {
        let mut created = Vec::new();
        for sheet in Sheet::ALL {
            if self
                .store
                .ensure_sheet(sheet.name(), sheet.default_headers())?
            {
                created.push(sheet);
            }
        }
        if !created.is_empty() {
            self.invalidate();
        }
        Ok(created)
    }

    /// Manual refresh: drop every cached sheet.
    pub fn invalidate(&mut self) {
        self.cache.invalidate_all();
    }

    pub fn drain_warnings(&mut self) -> Vec<String> {
        self.cache.drain_warnings()
    }
}
