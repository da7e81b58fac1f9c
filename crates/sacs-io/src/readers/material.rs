//! Optional single-row material table (`E, nu, fy, rho` or aliases).
//!
//! This reader never fails: anything it cannot find falls back, field by
//! field, to the defaults in [`sacs_model::material::defaults`].

use std::path::Path;

use sacs_model::MaterialOverrides;
use sacs_table::{Header, RawTable, parse_number};
use tracing::debug;

const HEADER_ROW: usize = 0;
const VALUE_ROW: usize = 1;

const ELASTIC_MODULUS_ALIASES: &[&str] = &["e", "e1", "young", "modulus"];
const POISSON_RATIO_ALIASES: &[&str] = &["nu", "poisson", "v", "nu12"];
const YIELD_STRENGTH_ALIASES: &[&str] = &["fy", "yield", "fy_mpa"];
const DENSITY_ALIASES: &[&str] = &["rho", "density", "densidad", "rho_kgm3"];

/// Reads the material table at `path`, if any. A missing or unreadable file
/// yields empty overrides.
pub fn read_material(path: Option<&Path>) -> MaterialOverrides {
    let Some(path) = path else {
        return MaterialOverrides::default();
    };
    match RawTable::parse_file(path) {
        Ok(table) => parse_material(&table),
        Err(err) => {
            debug!(%err, "material table unavailable, using defaults");
            MaterialOverrides::default()
        }
    }
}

pub fn parse_material(table: &RawTable) -> MaterialOverrides {
    let header = table.header(HEADER_ROW);
    let overrides = MaterialOverrides {
        elastic_modulus: pick(table, &header, ELASTIC_MODULUS_ALIASES),
        poisson_ratio: pick(table, &header, POISSON_RATIO_ALIASES),
        yield_strength: pick(table, &header, YIELD_STRENGTH_ALIASES),
        density: pick(table, &header, DENSITY_ALIASES),
    };
    debug!(?overrides, "material table read");
    overrides
}

/// Value under the first column whose name is one of `aliases`.
fn pick(table: &RawTable, header: &Header, aliases: &[&str]) -> Option<f64> {
    let col =
        header.position_where(|name| aliases.contains(&name.to_lowercase().as_str()))?;
    let value = table.cell(VALUE_ROW, col).and_then(parse_number);
    if value.is_none() {
        debug!(column = %header.names()[col], "material value unreadable");
    }
    value
}
