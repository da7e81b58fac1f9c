//! Numeric coercion of raw cells and bookkeeping of rejected rows.

use std::fmt::{Display, Formatter};

use tracing::debug;

/// Parses a trimmed cell as a finite number. Empty cells, text and `inf`/`NaN`
/// are rejected.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integral identifier. Exports sometimes write ids as `12.0`, which
/// is accepted; `12.5` is not.
pub fn parse_id(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    let value = parse_number(trimmed)?;
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The row is a units annotation (e.g. `mm` under a coordinate column).
    UnitRow,
    /// A required numeric field could not be coerced.
    InvalidNumber { column: String, value: String },
    /// A value that must be strictly positive is not.
    NonPositive { column: String, value: String },
    /// A required text field is empty.
    MissingValue { column: String },
    /// A later row repeats a key already taken by an earlier row.
    Duplicate { key: String },
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::UnitRow => write!(f, "units row"),
            DropReason::InvalidNumber { column, value } => {
                write!(f, "column '{column}' is not numeric ({value:?})")
            }
            DropReason::NonPositive { column, value } => {
                write!(f, "column '{column}' must be positive ({value})")
            }
            DropReason::MissingValue { column } => write!(f, "column '{column}' is empty"),
            DropReason::Duplicate { key } => write!(f, "duplicate of '{key}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// Zero-based index of the record in the raw table.
    pub row: usize,
    pub reason: DropReason,
}

/// Rows a reader accepted, plus the ones it rejected and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub rows: Vec<T>,
    pub dropped: Vec<DroppedRow>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

impl<T> Parsed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, row: T) {
        self.rows.push(row);
    }

    pub fn drop_row(&mut self, row: usize, reason: DropReason) {
        debug!(row, %reason, "dropping row");
        self.dropped.push(DroppedRow { row, reason });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Parsed<U> {
        Parsed {
            rows: self.rows.into_iter().map(f).collect(),
            dropped: self.dropped,
        }
    }
}

/// Coerces `value` under `column`, turning a failure into a [`DropReason`].
pub fn require<T>(
    value: &str,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, DropReason> {
    parse(value).ok_or_else(|| DropReason::InvalidNumber {
        column: column.to_string(),
        value: value.trim().to_string(),
    })
}
