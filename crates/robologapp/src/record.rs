//! # Records and Schemas
//!
//! A sheet is read as a [`Schema`] (the header row, resolved once per fetch) plus
//! positional rows. A [`Record`] is one data row: a vector of cell values aligned
//! with the schema, with name→index lookup through the shared schema.
//!
//! Rows shorter than the header are padded with empty strings and longer rows are
//! truncated, so every record has exactly `schema.width()` cells.
//!
//! ## Row Addressing
//!
//! Each record remembers its 0-based position in the sheet (`index`). The physical
//! sheet row is `index + 2`: one for the header, one because sheet rows are 1-based.
//! Filtering a [`Table`] keeps the original indexes, so a record picked from a
//! filtered view can still be written back to the right row.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use crate::model::normalize;

/// Offset between a record index and its physical sheet row.
pub const HEADER_OFFSET: usize = 2;

/// Physical, 1-based sheet row for a 0-based record index.
pub fn sheet_row(index: usize) -> usize {
    index + HEADER_OFFSET
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Exact header match, as used when building rows for append.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Trimmed, case-insensitive header match, as used for key columns and cell updates.
    pub fn find_column(&self, column: &str) -> Option<usize> {
        let wanted = normalize(column);
        self.columns.iter().position(|c| normalize(c) == wanted)
    }
}

/// Ordered (column, value) pairs for appends and partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cells(Vec<(String, String)>);

impl Cells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a cell, replacing an earlier value for the same column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.0.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// Lay the cells out in header order. Unknown columns are dropped, missing ones are empty.
    pub fn to_row(&self, schema: &Schema) -> Vec<String> {
        let mut row = vec![String::new(); schema.width()];
        for (column, value) in self.iter() {
            if let Some(pos) = schema.position(column) {
                row[pos] = value.to_string();
            }
        }
        row
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<String>,
    index: usize,
}

impl Record {
    pub fn new(schema: Arc<Schema>, mut values: Vec<String>, index: usize) -> Self {
        values.resize(schema.width(), String::new());
        Self {
            schema,
            values,
            index,
        }
    }

    /// Cell value by header name; empty when the column does not exist.
    ///
    /// An exact header wins, otherwise the trimmed, case-insensitive match is used.
    pub fn get(&self, column: &str) -> &str {
        self.schema
            .position(column)
            .or_else(|| self.schema.find_column(column))
            .and_then(|pos| self.values.get(pos))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// 0-based position of the record in its sheet.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-facing row label, 1-based (`Row 1` is the first data row).
    pub fn row_number(&self) -> usize {
        self.index + 1
    }

}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.schema.columns().iter().zip(self.values.iter()) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// A fetched sheet: its schema and its records in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    sheet: String,
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Table {
    pub fn empty(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            schema: Arc::new(Schema::default()),
            records: Vec::new(),
        }
    }

    /// Build a table from raw sheet values where row 0 is the header.
    pub fn from_values(sheet: impl Into<String>, mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::empty(sheet);
        }
        let header = rows.remove(0);
        let schema = Arc::new(Schema::new(header));
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Record::new(schema.clone(), row, i))
            .collect();
        Self {
            sheet: sheet.into(),
            schema,
            records,
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Record at a 0-based sheet index.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.iter().find(|r| r.index == index)
    }

    /// A new table with the same schema, keeping only matching records.
    pub fn filtered<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Record) -> bool,
    {
        Table {
            sheet: self.sheet.clone(),
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

}

/// Serialized as `{sheet, columns, rows: [{row, cells}]}` with 1-based row labels.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        #[derive(serde::Serialize)]
        struct Row<'a> {
            row: usize,
            cells: &'a Record,
        }

        let rows: Vec<Row<'_>> = self
            .records
            .iter()
            .map(|r| Row {
                row: r.row_number(),
                cells: r,
            })
            .collect();
        let mut state = serializer.serialize_struct("Table", 3)?;
        state.serialize_field("sheet", &self.sheet)?;
        state.serialize_field("columns", self.schema.columns())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
