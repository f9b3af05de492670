//! Text-only tabular data
//!
//! REDCap record exports are read into a [`RecordTable`] and written back out
//! unchanged. Cells stay as strings end to end, so codes like `007` or dates
//! in local formats survive the round trip exactly.

use crate::domain::{ExportError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A header row plus data rows, every cell kept as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Create a table from a header row and data rows
    ///
    /// # Errors
    ///
    /// Returns a validation error if any row's width differs from the header's.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ExportError::Validation(format!(
                "Row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// A table with headers and no rows
    pub fn header_only(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse CSV text with a header row
    ///
    /// A leading byte-order mark is ignored. An empty body yields an empty table.
    pub fn from_csv_str(body: &str) -> Result<Self> {
        Self::from_csv_reader(body.trim_start_matches('\u{feff}').as_bytes())
    }

    /// Parse CSV with a header row from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Column names in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, top to bottom
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Write as CSV with a header row and no index column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write to `path`, replacing any existing file
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            ExportError::Io(format!("Failed to create {}: {}", path.display(), e))
        })?;
        self.write_csv(file)
    }
}
