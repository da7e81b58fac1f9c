//! End-to-end conversion: read the five exports, assemble, write the deck.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sacs_model::{
    AssembledModel, AssemblyInputs, MaterialConstants, MaterialProvenance, MemberCategory,
    material::defaults,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::readers::{
    assignments::read_assignments,
    connectivity::read_connectivity,
    material::read_material,
    nodes::{LengthUnit, read_nodes},
    sections::read_sections,
};
use crate::sacs_writer::{write_deck, write_file};

/// One path per input and output artifact. Unset fields take the conventional
/// export names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub nodes: PathBuf,
    pub beams: PathBuf,
    pub braces: PathBuf,
    pub columns: PathBuf,
    pub assignments: PathBuf,
    pub sections: PathBuf,
    /// Optional; `None` or a missing file means default steel.
    pub material: Option<PathBuf>,
    pub geometry_out: PathBuf,
    pub mudline_out: PathBuf,
    /// Where to write the JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            nodes: PathBuf::from("nodos.csv"),
            beams: PathBuf::from("beam_conectivity.csv"),
            braces: PathBuf::from("brace_conectivity.csv"),
            columns: PathBuf::from("columns_conectivity.csv"),
            assignments: PathBuf::from("frame_assignments.csv"),
            sections: PathBuf::from("secciones.csv"),
            material: Some(PathBuf::from("material.csv")),
            geometry_out: PathBuf::from("jacket_model.inp"),
            mudline_out: PathBuf::from("mudline_joints.txt"),
            report: None,
        }
    }
}

impl ConversionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn connectivity_sources(&self) -> [(MemberCategory, &Path); 3] {
        [
            (MemberCategory::Beam, self.beams.as_path()),
            (MemberCategory::Brace, self.braces.as_path()),
            (MemberCategory::Column, self.columns.as_path()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub generated_at: DateTime<Utc>,
    pub length_unit: LengthUnit,
    pub nodes: usize,
    pub groups: usize,
    pub members: usize,
    pub members_by_category: BTreeMap<MemberCategory, usize>,
    pub mudline_joints: usize,
    pub sections_used: Vec<String>,
    /// Rows rejected by each reader, keyed by source file.
    pub dropped_rows: BTreeMap<String, usize>,
    pub material: MaterialConstants,
    pub material_provenance: MaterialProvenance,
    /// Set when every constant came from the default steel.
    pub default_material: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub model: AssembledModel,
    pub report: ConversionReport,
}

/// Reads every source and assembles the model without writing anything.
pub fn build_model(config: &ConversionConfig) -> Result<Conversion> {
    let mut dropped_rows = BTreeMap::new();

    let node_table = read_nodes(&config.nodes)?;
    dropped_rows.insert(label(&config.nodes), node_table.nodes.dropped.len());

    let mut connectivity = Vec::with_capacity(3);
    for (category, path) in config.connectivity_sources() {
        let ends = read_connectivity(path)?;
        dropped_rows.insert(label(path), ends.dropped.len());
        connectivity.push((category, ends.rows));
    }

    let assignments = read_assignments(&config.assignments)?;
    dropped_rows.insert(label(&config.assignments), assignments.dropped.len());

    let sections = read_sections(&config.sections)?;
    dropped_rows.insert(label(&config.sections), sections.dropped.len());

    let overrides = read_material(config.material.as_deref());
    let material = overrides.resolve();
    let provenance = overrides.provenance();

    let model = AssembledModel::assemble(AssemblyInputs {
        nodes: node_table.nodes.rows,
        connectivity,
        assignments: assignments.rows,
        sections: sections.rows,
        material,
    })?;

    let members_by_category = MemberCategory::ALL
        .iter()
        .map(|c| (*c, model.members_in(*c)))
        .collect();
    let report = ConversionReport {
        generated_at: Utc::now(),
        length_unit: node_table.unit,
        nodes: model.nodes.len(),
        groups: model.groups.len(),
        members: model.members.len(),
        members_by_category,
        mudline_joints: model.mudline_nodes().count(),
        sections_used: model.used_labels.iter().cloned().collect(),
        dropped_rows,
        material,
        material_provenance: provenance,
        default_material: provenance.all_defaulted().then_some(defaults::NAME),
    };

    Ok(Conversion { model, report })
}

/// Runs the whole conversion. Reading and assembly finish before anything is
/// written, so a failure there leaves no output behind.
pub fn convert(config: &ConversionConfig) -> Result<Conversion> {
    let conversion = build_model(config)?;

    write_deck(&conversion.model, &config.geometry_out, &config.mudline_out)?;
    info!(
        geometry = %config.geometry_out.display(),
        mudline = %config.mudline_out.display(),
        "wrote SACS deck"
    );

    if let Some(path) = &config.report {
        save_report(path, &conversion.report)?;
    }
    Ok(conversion)
}

pub fn save_report(path: impl AsRef<Path>, report: &ConversionReport) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(report)?;
    write_file(path.as_ref(), bytes)?;
    Ok(())
}

fn label(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_conventional_file_names() {
        let config = ConversionConfig::default();
        assert_eq!(config.nodes, PathBuf::from("nodos.csv"));
        assert_eq!(config.material, Some(PathBuf::from("material.csv")));
        assert_eq!(config.geometry_out, PathBuf::from("jacket_model.inp"));
        assert_eq!(config.mudline_out, PathBuf::from("mudline_joints.txt"));
        assert!(config.report.is_none());

        let categories: Vec<MemberCategory> =
            config.connectivity_sources().iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, MemberCategory::ALL.to_vec());
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("convert.json");
        fs::write(&path, r#"{ "nodes": "export/joints.csv", "material": null }"#)
            .expect("write config");

        let config = ConversionConfig::load(&path).expect("config should load");
        assert_eq!(config.nodes, PathBuf::from("export/joints.csv"));
        assert_eq!(config.material, None);
        assert_eq!(config.sections, PathBuf::from("secciones.csv"));
    }

    #[test]
    fn malformed_config_is_a_json_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("convert.json");
        fs::write(&path, "{ nodes: ").expect("write config");
        let err = ConversionConfig::load(&path).expect_err("invalid JSON");
        assert!(err.to_string().starts_with("JSON error"), "unexpected: {err}");
    }
}
