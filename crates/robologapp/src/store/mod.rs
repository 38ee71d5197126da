//! # Storage Layer
//!
//! This module defines the storage abstraction for robolog. The [`RecordStore`]
//! trait is the spreadsheet adapter contract: everything above it speaks in sheet
//! titles, header names and record indexes, never in raw cell coordinates.
//!
//! ## Layers
//!
//! 1. [`backend::SheetBackend`]: raw worksheet I/O with 1-based rows and columns.
//! 2. [`sheet_store::SheetStore`]: header resolution, key lookup, row addressing.
//! 3. [`crate::cache::ReadCache`]: time-bounded cache of full-sheet reads, sitting
//!    on top of a store. Mutations go straight to the store.
//!
//! ## Matching Rules
//!
//! - **Appends** lay values out by *exact* header name. Keys that match no header
//!   are dropped, headers with no value are written empty.
//! - **Key lookups** (find, update, delete, set-where) compare both the key column
//!   header and the cell values after trimming and lowercasing. The first matching
//!   row wins, scanning top to bottom.
//! - **Cell updates** find each header loosely and rewrite only the named cells.
//!   The rest of the row is untouched.
//! - A missing key column is an error, never a silent no-op.
//!
//! ## Row Addressing
//!
//! Record index `i` lives on sheet row `i + 2` (see [`crate::record::sheet_row`]).
//! Deleting a row shifts every row below it, so indexes held from an earlier fetch
//! are stale once anything is deleted.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: workbook as a directory of CSV files.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O, with
//!   failure simulation for rate limits and write errors.
//!
//! ## Storage Layout
//!
//! ```text
//! workbook/
//! ├── credentials.json
//! ├── robolog.toml
//! └── {Sheet Title}.csv    # One file per worksheet, header row first
//! ```

use crate::error::Result;
use crate::record::{Cells, Record, Table};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod sheet_store;

pub use sheet_store::SheetStore;

/// Abstract interface for record-level sheet access.
pub trait RecordStore {
    /// Titles of every worksheet in the workbook.
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Create a worksheet with the given header row if it does not exist yet.
    /// Returns whether it was created.
    fn ensure_sheet(&mut self, sheet: &str, header: &[&str]) -> Result<bool>;

    /// Read a whole sheet. Uncached.
    fn fetch_all(&self, sheet: &str) -> Result<Table>;

    /// Append a row laid out by header name.
    fn append(&mut self, sheet: &str, cells: &Cells) -> Result<()>;

    /// First record whose key cell matches.
    fn find_by_key(&self, sheet: &str, key_column: &str, key: &str) -> Result<Option<Record>>;

    /// Rewrite the named cells of the first matching row. `Ok(false)` if no row matched.
    fn update_by_key(&mut self, sheet: &str, key_column: &str, key: &str, cells: &Cells) -> Result<bool>;

    /// Rewrite the named cells of the record at a 0-based index.
    fn update_row(&mut self, sheet: &str, index: usize, cells: &Cells) -> Result<()>;

    /// Delete the first matching row. `Ok(false)` if no row matched.
    fn delete_by_key(&mut self, sheet: &str, key_column: &str, key: &str) -> Result<bool>;

    /// Delete the record at a 0-based index.
    fn delete_row(&mut self, sheet: &str, index: usize) -> Result<()>;

    /// Set one column on every matching row. Returns how many rows were touched.
    fn set_where(
        &mut self,
        sheet: &str,
        key_column: &str,
        key: &str,
        column: &str,
        value: &str,
    ) -> Result<usize>;
}
