//! SACS geometry deck writer
//!
//! Writes the SECT/GRUP/JOINT/MEMBER blocks of a SACS input file, plus the
//! companion list of mudline joints to be fixed in the target model.

use std::fs;
use std::io;
use std::path::Path;

use sacs_model::{AssembledModel, MUDLINE_TOLERANCE, joint_tag};

const RULE: &str = "* ============================================================";
const NAME_WIDTH: usize = 12;

/// Renders the geometry deck. The output depends only on the model, so equal
/// models give byte-identical decks.
pub fn render_geometry(model: &AssembledModel) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "* SACS geometric model generated from CSV exports (SI: m, N, Pa)".to_string(),
        "* JOINT/SECT/GRUP/MEMBER - no releases; supports see mudline list".to_string(),
        RULE.to_string(),
        "OPTIONS  MN".to_string(),
        String::new(),
    ];

    lines.push("* --- TUBULAR SECTIONS ---".to_string());
    lines.push("SECT".to_string());
    for group in &model.groups {
        lines.push(format!(
            "SECT  {:<w$}  TUB  {:.6}  {:.6}",
            group.section,
            group.outer_diameter,
            group.wall_thickness,
            w = NAME_WIDTH
        ));
    }
    lines.push(String::new());

    lines.push("* --- GROUPS (material/section) ---".to_string());
    lines.push("GRUP".to_string());
    for group in &model.groups {
        let m = &group.material;
        lines.push(format!(
            "GRUP  {:<w$}  {:<w$}  {}  {:.2}  {}  {:.1}",
            group.name,
            group.section,
            format_sci(m.elastic_modulus, 6),
            m.poisson_ratio,
            format_sci(m.yield_strength, 6),
            m.density,
            w = NAME_WIDTH
        ));
    }
    lines.push(String::new());

    lines.push("* --- JOINTS (id  X  Y  Z) ---".to_string());
    lines.push("JOINT".to_string());
    for node in &model.nodes {
        lines.push(format!(
            "JOINT  {:<w$}  {:.3}  {:.3}  {:.3}",
            node.tag(),
            node.x,
            node.y,
            node.z,
            w = NAME_WIDTH
        ));
    }
    lines.push(String::new());

    lines.push("* --- MEMBERS (A  B  group) ---".to_string());
    lines.push("MEMBER".to_string());
    for member in &model.members {
        lines.push(format!(
            "MEMBER  {:<w$}  {:<w$}  {}",
            joint_tag(member.joint_i),
            joint_tag(member.joint_j),
            member.group,
            w = NAME_WIDTH
        ));
    }
    lines.push("END".to_string());

    let mut deck = lines.join("\n");
    deck.push('\n');
    deck
}

/// Renders the list of joints at the mudline, one tag per line.
pub fn render_mudline(model: &AssembledModel) -> String {
    let mut out = format!(
        "* Joints to fix at mudline (|Z| <= {MUDLINE_TOLERANCE} m) - restrain UX,UY,UZ,RX,RY,RZ\n"
    );
    for node in model.mudline_nodes() {
        out.push_str(&node.tag());
        out.push('\n');
    }
    out
}

/// Writes both files. Nothing is written unless both render, and the deck goes
/// first so a failed list write never leaves a list without its deck.
pub fn write_deck(
    model: &AssembledModel,
    geometry_path: impl AsRef<Path>,
    mudline_path: impl AsRef<Path>,
) -> io::Result<()> {
    let geometry = render_geometry(model);
    let mudline = render_mudline(model);
    write_file(geometry_path.as_ref(), &geometry)?;
    write_file(mudline_path.as_ref(), &mudline)
}

pub(crate) fn write_file(path: &Path, body: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}

/// Scientific notation with a signed exponent of at least two digits
/// (`1.999480E+11`), as fixed-format decks expect.
pub fn format_sci(value: f64, decimals: usize) -> String {
    let raw = format!("{value:.decimals$E}");
    match raw.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}E{sign}{:02}", exponent.abs())
        }
        None => raw,
    }
}
