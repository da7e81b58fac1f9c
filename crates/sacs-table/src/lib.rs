//! Loosely structured CSV tables as exported by frame-analysis tools.
//!
//! Exports from ETABS/SAP-style programs put a title line above the column
//! names, a units line below them, and are not consistent about either. This
//! crate keeps the raw cells untouched and leaves the interpretation to the
//! readers:
//! - [`RawTable`] loads every record verbatim (no header handling)
//! - [`HeaderProbe`] sniffs which row carries the column names
//! - [`Parsed`] carries accepted rows together with the rows that were dropped

mod coerce;
mod sniffer;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use coerce::{DropReason, DroppedRow, Parsed, parse_id, parse_number, require};
pub use sniffer::{HeaderMatch, HeaderProbe, Marker};

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::Read {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        Self::from_reader(file).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse_str(raw: &str) -> Result<Self, TableError> {
        Ok(Self::from_reader(raw.as_bytes())?)
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut record = csv::ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            // Exports are not always valid UTF-8 (Latin-1 unit symbols).
            let cells: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect();
            rows.push(cells);
        }

        if let Some(first) = rows.first_mut().and_then(|row| row.first_mut())
            && first.starts_with(BYTE_ORDER_MARK)
        {
            *first = first.trim_start_matches(BYTE_ORDER_MARK).to_string();
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Column names taken from `row`, trimmed. Out of range yields no columns.
    pub fn header(&self, row: usize) -> Header {
        let names = self
            .rows
            .get(row)
            .map(|cells| cells.iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        Header { names }
    }

    /// Rows from `start` onwards, paired with their raw row index.
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, cells)| (i, cells.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn position_where(&self, mut predicate: impl FnMut(&str) -> bool) -> Option<usize> {
        self.names.iter().position(|n| predicate(n))
    }
}

/// Cell lookup that treats short rows as empty cells.
pub fn cell_at(cells: &[String], column: usize) -> &str {
    cells.get(column).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_every_record_including_title_and_units() {
        let src = "TABLE: Point Object Connectivity\nUniqueName,X,Y,Z\n,mm,mm,mm\n1,0,0,0\n";
        let table = RawTable::parse_str(src).expect("table should parse");
        assert_eq!(table.len(), 4);
        assert_eq!(table.cell(0, 0), Some("TABLE: Point Object Connectivity"));
        assert_eq!(table.cell(2, 1), Some("mm"));
        assert_eq!(table.cell(3, 3), Some("0"));
    }

    #[test]
    fn tolerates_ragged_rows() {
        let src = "a\nb,c,d\ne,f\n";
        let table = RawTable::parse_str(src).expect("ragged rows are accepted");
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(cell_at(&table.rows[0], 2), "");
    }

    #[test]
    fn strips_byte_order_mark_from_first_cell() {
        let src = "\u{feff}UniqueName,X\n1,2\n";
        let table = RawTable::parse_str(src).expect("table should parse");
        assert_eq!(table.header(0).position("UniqueName"), Some(0));
    }

    #[test]
    fn header_names_are_trimmed() {
        let table = RawTable::parse_str("Name , Outside Diameter\n").expect("parse");
        let header = table.header(0);
        assert_eq!(header.position("Outside Diameter"), Some(1));
        assert_eq!(header.position("Name"), Some(0));
        assert!(table.header(5).is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RawTable::parse_file("/nonexistent/dir/nodos.csv").expect_err("should fail");
        assert!(err.to_string().contains("nodos.csv"), "unexpected: {err}");
    }
}
