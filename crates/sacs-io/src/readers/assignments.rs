//! Frame section assignments (`Frame ..., Section Property`).

use std::collections::HashSet;
use std::path::Path;

use sacs_model::SectionAssignment;
use sacs_table::{DropReason, HeaderProbe, Marker, Parsed, RawTable, cell_at, parse_id, require};
use tracing::info;

use super::{require_column, source_name};
use crate::error::Result;

/// The section column is mandatory; the id column name varies between exports.
pub const SECTION_COLUMN: &str = "Section Property";

const HEADER: HeaderProbe = HeaderProbe::new(12, &[Marker::Exact(SECTION_COLUMN)], 1);

const ID_ALIASES: [&str; 5] = ["uniquename", "frame name", "frame", "id", "unique name"];

pub fn read_assignments(path: impl AsRef<Path>) -> Result<Parsed<SectionAssignment>> {
    let path = path.as_ref();
    let table = RawTable::parse_file(path)?;
    parse_assignments(&table, &source_name(path))
}

pub fn parse_assignments(table: &RawTable, source: &str) -> Result<Parsed<SectionAssignment>> {
    let header_row = HEADER.locate(table).index();
    let header = table.header(header_row);

    let id_col = header
        .position_where(|name| ID_ALIASES.contains(&name.to_lowercase().as_str()))
        .unwrap_or(0);
    let section_col = require_column(&header, SECTION_COLUMN, source)?;
    let id_name = header
        .names()
        .get(id_col)
        .map(String::as_str)
        .unwrap_or("frame_id");

    let mut parsed = Parsed::new();
    let mut seen = HashSet::new();
    for (row, cells) in table.rows_from(header_row + 1) {
        let frame_id = match require(cell_at(cells, id_col), id_name, parse_id) {
            Ok(id) => id,
            Err(reason) => {
                parsed.drop_row(row, reason);
                continue;
            }
        };
        let label = cell_at(cells, section_col).trim();
        if label.is_empty() {
            parsed.drop_row(
                row,
                DropReason::MissingValue {
                    column: SECTION_COLUMN.to_string(),
                },
            );
            continue;
        }
        if !seen.insert(frame_id) {
            parsed.drop_row(
                row,
                DropReason::Duplicate {
                    key: frame_id.to_string(),
                },
            );
            continue;
        }
        parsed.accept(SectionAssignment {
            frame_id,
            label: label.to_string(),
        });
    }

    info!(
        source,
        assignments = parsed.len(),
        dropped = parsed.dropped.len(),
        "read section assignments"
    );
    Ok(parsed)
}
