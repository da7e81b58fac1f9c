//! Frame connectivity (`UniqueName, ..., UniquePtI, UniquePtJ`), one table per
//! member category. The category itself is not in the file; the caller tags
//! the result.

use std::path::Path;

use sacs_model::MemberEnds;
use sacs_table::{DropReason, Header, Parsed, RawTable, cell_at, parse_id, require};
use tracing::info;

use super::source_name;
use crate::error::{ConvertError, Result};

const HEADER_ROW: usize = 0;
/// Row 1 holds units/metadata, data starts below it.
const FIRST_DATA_ROW: usize = 2;

const FRAME_COLUMN: usize = 0;
const FALLBACK_I_COLUMN: usize = 3;
const FALLBACK_J_COLUMN: usize = 4;

const FRAME_FIELD: &str = "frame_id";
const I_FIELD: &str = "UniquePtI";
const J_FIELD: &str = "UniquePtJ";

pub fn read_connectivity(path: impl AsRef<Path>) -> Result<Parsed<MemberEnds>> {
    let path = path.as_ref();
    let table = RawTable::parse_file(path)?;
    parse_connectivity(&table, &source_name(path))
}

pub fn parse_connectivity(table: &RawTable, source: &str) -> Result<Parsed<MemberEnds>> {
    let header = table.header(HEADER_ROW);
    if header.is_empty() {
        return Err(ConvertError::schema(source, FRAME_FIELD));
    }
    let col_i = endpoint_column(&header, 'i', FALLBACK_I_COLUMN, source, I_FIELD)?;
    let col_j = endpoint_column(&header, 'j', FALLBACK_J_COLUMN, source, J_FIELD)?;

    let mut parsed = Parsed::new();
    for (row, cells) in table.rows_from(FIRST_DATA_ROW) {
        match parse_row(cells, col_i, col_j) {
            Ok(ends) => parsed.accept(ends),
            Err(reason) => parsed.drop_row(row, reason),
        }
    }

    info!(
        source,
        frames = parsed.len(),
        dropped = parsed.dropped.len(),
        "read connectivity"
    );
    Ok(parsed)
}

fn parse_row(
    cells: &[String],
    col_i: usize,
    col_j: usize,
) -> std::result::Result<MemberEnds, DropReason> {
    Ok(MemberEnds {
        frame_id: require(cell_at(cells, FRAME_COLUMN), FRAME_FIELD, parse_id)?,
        joint_i: require(cell_at(cells, col_i), I_FIELD, parse_id)?,
        joint_j: require(cell_at(cells, col_j), J_FIELD, parse_id)?,
    })
}

/// First column named like `UniquePtI` / `Unique Point I` for `end`, else the
/// positional fallback. Plain `Point I` label columns are not unique ids and
/// never match.
fn endpoint_column(
    header: &Header,
    end: char,
    fallback: usize,
    source: &str,
    field: &str,
) -> Result<usize> {
    let found = header.position_where(|name| {
        let key = normalize(name);
        (key.contains("uniquept") || key.contains("uniquepoint")) && key.ends_with(end)
    });
    match found {
        Some(col) => Ok(col),
        None if fallback < header.len() => Ok(fallback),
        None => Err(ConvertError::schema(source, field)),
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}
