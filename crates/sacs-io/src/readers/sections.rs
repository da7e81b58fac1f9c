//! Pipe section definitions (`Name, Material, Outside Diameter, Wall Thickness`),
//! dimensions in millimeters.

use std::collections::HashSet;
use std::path::Path;

use sacs_model::SectionProperty;
use sacs_table::{
    DropReason, HeaderProbe, Marker, Parsed, RawTable, cell_at, parse_number, require,
};
use tracing::info;

use super::{require_column, source_name};
use crate::error::Result;

const NAME_COLUMN: &str = "Name";
const DIAMETER_COLUMN: &str = "Outside Diameter";
const THICKNESS_COLUMN: &str = "Wall Thickness";
const MATERIAL_COLUMN: &str = "Material";

const HEADER: HeaderProbe = HeaderProbe::new(
    12,
    &[Marker::Exact(NAME_COLUMN), Marker::Exact(DIAMETER_COLUMN)],
    0,
);

/// Metadata/units rows between the header and the first section.
pub const SECTION_METADATA_ROWS: usize = 2;

const MILLIMETERS_PER_METER: f64 = 1000.0;

struct Columns {
    name: usize,
    diameter: usize,
    thickness: usize,
    material: Option<usize>,
}

pub fn read_sections(path: impl AsRef<Path>) -> Result<Parsed<SectionProperty>> {
    let path = path.as_ref();
    let table = RawTable::parse_file(path)?;
    parse_sections(&table, &source_name(path))
}

pub fn parse_sections(table: &RawTable, source: &str) -> Result<Parsed<SectionProperty>> {
    let header_row = HEADER.locate(table).index();
    let header = table.header(header_row);
    let columns = Columns {
        name: require_column(&header, NAME_COLUMN, source)?,
        diameter: require_column(&header, DIAMETER_COLUMN, source)?,
        thickness: require_column(&header, THICKNESS_COLUMN, source)?,
        material: header.position(MATERIAL_COLUMN),
    };

    let mut parsed = Parsed::new();
    let mut seen = HashSet::new();
    for (row, cells) in table.rows_from(header_row + 1 + SECTION_METADATA_ROWS) {
        match parse_row(cells, &columns) {
            Ok(section) if seen.contains(&section.label) => parsed.drop_row(
                row,
                DropReason::Duplicate {
                    key: section.label,
                },
            ),
            Ok(section) => {
                seen.insert(section.label.clone());
                parsed.accept(section);
            }
            Err(reason) => parsed.drop_row(row, reason),
        }
    }

    info!(
        source,
        sections = parsed.len(),
        dropped = parsed.dropped.len(),
        "read section properties"
    );
    Ok(parsed)
}

fn parse_row(cells: &[String], columns: &Columns) -> std::result::Result<SectionProperty, DropReason> {
    let label = cell_at(cells, columns.name).trim();
    if label.is_empty() {
        return Err(DropReason::MissingValue {
            column: NAME_COLUMN.to_string(),
        });
    }
    let diameter = positive(cell_at(cells, columns.diameter), DIAMETER_COLUMN)?;
    let thickness = positive(cell_at(cells, columns.thickness), THICKNESS_COLUMN)?;
    let material = columns
        .material
        .map(|col| cell_at(cells, col).trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    Ok(SectionProperty {
        label: label.to_string(),
        outer_diameter: diameter / MILLIMETERS_PER_METER,
        wall_thickness: thickness / MILLIMETERS_PER_METER,
        material,
    })
}

fn positive(cell: &str, column: &str) -> std::result::Result<f64, DropReason> {
    let value = require(cell, column, parse_number)?;
    if value <= 0.0 {
        return Err(DropReason::NonPositive {
            column: column.to_string(),
            value: cell.trim().to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Parsed<SectionProperty>> {
        let table = RawTable::parse_str(src).expect("table should parse");
        parse_sections(&table, "secciones.csv")
    }

    #[test]
    fn converts_millimeters_and_skips_two_metadata_rows() {
        let src = "TABLE: Frame Section Property Definitions - Pipe\n\
                   Name,Material,From File?,Outside Diameter,Wall Thickness\n\
                   Text,Text,Yes/No,mm,mm\n\
                   ,,,,\n\
                   P1,A992Fy50,No,500,20\n\
                   P2,,No,914.4,25.4\n";
        let parsed = parse(src).expect("sections should parse");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.dropped.is_empty());

        let p1 = &parsed.rows[0];
        assert_eq!(p1.label, "P1");
        assert_eq!(p1.outer_diameter, 0.5);
        assert_eq!(p1.wall_thickness, 0.02);
        assert_eq!(p1.material.as_deref(), Some("A992Fy50"));

        let p2 = &parsed.rows[1];
        assert_eq!(p2.outer_diameter, 914.4 / 1000.0);
        assert_eq!(p2.material, None);
    }

    #[test]
    fn header_defaults_to_first_row() {
        let src = "Label,Outside Diameter,Wall Thickness\nmeta\nmeta\nP1,500,20\n";
        let err = parse(src).expect_err("Name column is required");
        assert!(err.to_string().contains("'Name'"), "unexpected: {err}");
    }

    #[test]
    fn material_column_is_optional() {
        let src = "Name,Outside Diameter,Wall Thickness\nmm\nmm\nP1,273.1,9.27\n";
        let parsed = parse(src).expect("sections should parse");
        assert_eq!(parsed.rows[0].material, None);
        assert_eq!(parsed.rows[0].wall_thickness, 9.27 / 1000.0);
    }

    #[test]
    fn drops_unnamed_non_numeric_and_non_positive_rows() {
        let src = "Name,Outside Diameter,Wall Thickness\nmm\nmm\n\
                   ,500,20\n\
                   P2,n/a,20\n\
                   P3,500,0\n\
                   P4,600,25\n";
        let parsed = parse(src).expect("sections should parse");
        let labels: Vec<&str> = parsed.rows.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["P4"]);
        let reasons: Vec<&DropReason> = parsed.dropped.iter().map(|d| &d.reason).collect();
        assert!(matches!(reasons[0], DropReason::MissingValue { .. }));
        assert!(matches!(reasons[1], DropReason::InvalidNumber { .. }));
        assert!(matches!(reasons[2], DropReason::NonPositive { .. }));
    }

    #[test]
    fn repeated_label_keeps_first_definition() {
        let src = "Name,Outside Diameter,Wall Thickness\nmm\nmm\n\
                   P1,500,20\n\
                   P1,600,25\n";
        let parsed = parse(src).expect("sections should parse");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.rows[0].outer_diameter, 0.5);
        assert_eq!(
            parsed.dropped[0].reason,
            DropReason::Duplicate {
                key: "P1".to_string()
            }
        );
    }
}
