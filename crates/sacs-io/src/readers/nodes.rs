//! Joint coordinates (`UniqueName, X, Y, Z`), in millimeters or meters.

use std::collections::HashSet;
use std::path::Path;

use sacs_model::Node;
use sacs_table::{
    DropReason, HeaderProbe, Marker, Parsed, RawTable, cell_at, parse_id, parse_number, require,
};
use serde::Serialize;
use tracing::info;

use super::{require_column, source_name};
use crate::error::Result;

const HEADER: HeaderProbe = HeaderProbe::new(
    6,
    &[Marker::Contains("uniquename"), Marker::EqualsIgnoreCase("x")],
    1,
);

const ID_COLUMN: &str = "UniqueName";
const X_COLUMN: &str = "X";
const Y_COLUMN: &str = "Y";
const Z_COLUMN: &str = "Z";

/// Marker found in the X cell of the units row.
const UNIT_MARKER: &str = "mm";

/// Median |x| above this means the table is in millimeters. Models that are
/// genuinely this large in meters are misread; there is no other signal.
pub const MILLIMETER_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Meter,
    Millimeter,
}

impl LengthUnit {
    /// How many of this unit make one meter.
    pub fn per_meter(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Millimeter => 1000.0,
        }
    }
}

struct Columns {
    id: usize,
    x: usize,
    y: usize,
    z: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeTable {
    /// Nodes in meters.
    pub nodes: Parsed<Node>,
    /// Unit the table was found to be written in.
    pub unit: LengthUnit,
}

pub fn read_nodes(path: impl AsRef<Path>) -> Result<NodeTable> {
    let path = path.as_ref();
    let table = RawTable::parse_file(path)?;
    parse_nodes(&table, &source_name(path))
}

pub fn parse_nodes(table: &RawTable, source: &str) -> Result<NodeTable> {
    let header_row = HEADER.locate(table).index();
    let header = table.header(header_row);

    let x = require_column(&header, X_COLUMN, source)?;
    let columns = Columns {
        id: require_column(&header, ID_COLUMN, source)?,
        x,
        y: require_column(&header, Y_COLUMN, source)?,
        z: require_column(&header, Z_COLUMN, source)?,
    };

    let mut raw = Parsed::new();
    let mut seen = HashSet::new();
    for (row, cells) in table.rows_from(header_row + 1) {
        if cell_at(cells, columns.x).contains(UNIT_MARKER) {
            raw.drop_row(row, DropReason::UnitRow);
            continue;
        }
        match parse_row(cells, &columns) {
            Ok(node) if !seen.insert(node.id) => raw.drop_row(
                row,
                DropReason::Duplicate {
                    key: node.id.to_string(),
                },
            ),
            Ok(node) => raw.accept(node),
            Err(reason) => raw.drop_row(row, reason),
        }
    }

    let unit = infer_length_unit(raw.rows.iter().map(|n| n.x));
    let d = unit.per_meter();
    let nodes = raw.map(|n| Node::new(n.id, n.x / d, n.y / d, n.z / d));

    info!(
        source,
        nodes = nodes.len(),
        dropped = nodes.dropped.len(),
        ?unit,
        "read joints"
    );
    Ok(NodeTable { nodes, unit })
}

fn parse_row(cells: &[String], columns: &Columns) -> std::result::Result<Node, DropReason> {
    Ok(Node::new(
        require(cell_at(cells, columns.id), ID_COLUMN, parse_id)?,
        require(cell_at(cells, columns.x), X_COLUMN, parse_number)?,
        require(cell_at(cells, columns.y), Y_COLUMN, parse_number)?,
        require(cell_at(cells, columns.z), Z_COLUMN, parse_number)?,
    ))
}

/// Decides the unit from the median absolute first coordinate. An empty
/// column is taken to be in meters.
pub fn infer_length_unit(xs: impl IntoIterator<Item = f64>) -> LengthUnit {
    let mut magnitudes: Vec<f64> = xs.into_iter().map(f64::abs).collect();
    match median(&mut magnitudes) {
        Some(m) if m > MILLIMETER_THRESHOLD => LengthUnit::Millimeter,
        _ => LengthUnit::Meter,
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
