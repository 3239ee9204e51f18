//! The per-session SDRF working table.
//!
//! Cells are `Option<String>`: a missing value is `None` everywhere inside
//! the library. The `"empty"` sentinel used by grid editors is converted at
//! the edges ([`WorkingTable::read_tsv`], [`WorkingTable::restore_missing`]).

pub mod fill;
mod labels;
pub mod modification;
mod template;

pub use labels::{ALL_FILES, LABEL_COLUMN};
pub use modification::{
    write_modifications, ModificationParameter, ModificationPosition, ModificationType,
    UnimodCatalog, MODIFICATION_COLUMN,
};
pub use template::{split_file_names, SpeciesTemplate, DATA_FILE_COLUMN, TEMPLATE_EXTRA_COLUMNS};

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use indexmap::IndexSet;

use crate::error::{Result, SdrfError};

/// Marker grid editors write for a cell that has no value.
pub const MISSING_SENTINEL: &str = "empty";

/// Whether a raw cell means "no value".
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == MISSING_SENTINEL
}

fn cell_from_raw(value: &str) -> Option<String> {
    if is_missing(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Samples × SDRF columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl WorkingTable {
    /// Create a table with columns but no rows.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from raw string rows. Short rows are padded, long rows truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(SdrfError::EmptyData("No columns found".to_string()));
        }
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<Option<String>> = row.iter().map(|v| cell_from_raw(v)).collect();
                cells.resize(width, None);
                cells
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Parse a tab-separated table with a header row.
    pub fn read_tsv(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(SdrfError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::from_rows(headers, rows)
    }

    /// Load a TSV file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SdrfError::io(path, e))?;
        let table = Self::read_tsv(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }

    /// Write the table as TSV in its current column order, missing cells empty.
    pub fn write_tsv(&self, writer: impl Write) -> Result<()> {
        let mut out = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        out.flush().map_err(|e| SdrfError::io("<table output>", e))?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of `name`, or `MissingColumn`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SdrfError::MissingColumn(name.to_string()))
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        self.get(row, self.column_index(name)?)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Option<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value;
        }
    }

    /// Index of `name`, appending an empty column when it is absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column_index(name) {
            Some(index) => index,
            None => self.insert_column_at(self.headers.len(), name),
        }
    }

    /// Index of `name`, inserting it right after `anchor` when it is absent.
    pub fn insert_column_after(&mut self, anchor: &str, name: &str) -> Result<usize> {
        if let Some(index) = self.column_index(name) {
            return Ok(index);
        }
        let anchor = self.require_column(anchor)?;
        Ok(self.insert_column_at(anchor + 1, name))
    }

    fn insert_column_at(&mut self, index: usize, name: &str) -> usize {
        self.headers.insert(index, name.to_string());
        for row in &mut self.rows {
            row.insert(index, None);
        }
        index
    }

    /// Set every row of `name` to `value`, creating the column if needed.
    pub fn set_constant(&mut self, name: &str, value: &str) {
        let index = self.ensure_column(name);
        for row in &mut self.rows {
            row[index] = cell_from_raw(value);
        }
    }

    /// Replace a column's values, creating it if needed.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(SdrfError::RowCountMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        let index = self.ensure_column(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value.filter(|v| !is_missing(v));
        }
        Ok(())
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_deref()).collect())
    }

    /// Non-missing values of a column, once each, in row order.
    pub fn distinct_values(&self, name: &str) -> Result<IndexSet<&str>> {
        Ok(self.column_values(name)?.into_iter().flatten().collect())
    }

    /// Blank every cell of a column.
    pub fn clear_column(&mut self, name: &str) -> Result<()> {
        let index = self.require_column(name)?;
        for row in &mut self.rows {
            row[index] = None;
        }
        Ok(())
    }

    /// Turn blank and `"empty"` cells back into missing values.
    pub fn restore_missing(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.as_deref().is_some_and(is_missing) {
                *cell = None;
            }
        }
    }

    /// Grow or shrink to `count` rows; new rows are all missing.
    pub fn resize_rows(&mut self, count: usize) {
        let width = self.headers.len();
        self.rows.resize_with(count, || vec![None; width]);
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Fill `comment[data file]` with one raw file name per row.
    ///
    /// A table without rows gets one row per name; otherwise the row count
    /// must match.
    pub fn assign_data_files(&mut self, names: &[String], limit: usize) -> Result<()> {
        if names.len() > limit {
            return Err(SdrfError::LimitExceeded {
                count: names.len(),
                limit,
            });
        }
        if self.rows.is_empty() {
            self.resize_rows(names.len());
        }
        self.set_column(
            DATA_FILE_COLUMN,
            names.iter().map(|n| Some(n.clone())).collect(),
        )
    }
}
