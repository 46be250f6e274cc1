//! Whole-file CSV tables.

use crate::{ImportError, Result};
use std::fs;
use std::path::Path;

/// A CSV file held in memory: one header row and ragged data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Header cells.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter or longer than the header.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Read a table from a file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        let table = Self::from_csv_str(&content).map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if table.headers.is_empty() {
            return Err(ImportError::MissingHeader {
                path: path.to_path_buf(),
            });
        }
        Ok(table)
    }

    /// Parse a table from CSV text.
    pub fn from_csv_str(content: &str) -> Result<Self, csv::Error> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self { headers, rows })
    }

    /// Serialize the table to CSV text.
    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the table to a file, replacing it.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.to_csv_string().map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|e| ImportError::io(path, e))
    }

    /// Index of the header named `name`, falling back to the first column.
    #[must_use]
    pub fn column_or_first(&self, name: &str) -> usize {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .unwrap_or(0)
    }
}
