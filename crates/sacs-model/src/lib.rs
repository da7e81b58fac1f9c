//! In-memory frame model shared by the table readers and the SACS writer.
//!
//! Everything here is in SI units (m, N, Pa, kg/m³) and identified by the
//! integer ids of the source export.

mod assembly;
pub mod material;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

pub use assembly::{AssemblyError, AssemblyInputs};
pub use material::{MaterialConstants, MaterialOverrides, MaterialProvenance, ValueSource};

/// Prefix used for every joint reference in the target deck.
pub const JOINT_PREFIX: char = 'J';

/// Suffix appended to a section label to name its group.
pub const GROUP_SUFFIX: &str = "_GRP";

/// Joints with |z| at or below this elevation (m) sit on the mudline.
pub const MUDLINE_TOLERANCE: f64 = 0.001;

/// Renders a joint id the way the target deck references it (`J12`).
pub fn joint_tag(id: i64) -> String {
    format!("{JOINT_PREFIX}{id}")
}

pub fn group_name(section_label: &str) -> String {
    format!("{section_label}{GROUP_SUFFIX}")
}

/// A joint of the frame model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    /// X coordinate [m]
    pub x: f64,
    /// Y coordinate [m]
    pub y: f64,
    /// Z coordinate (elevation) [m]
    pub z: f64,
}

impl Node {
    pub fn new(id: i64, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    pub fn tag(&self) -> String {
        joint_tag(self.id)
    }

    pub fn is_on_mudline(&self) -> bool {
        self.z.abs() <= MUDLINE_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberCategory {
    Beam,
    Brace,
    Column,
}

impl MemberCategory {
    pub const ALL: [MemberCategory; 3] = [
        MemberCategory::Beam,
        MemberCategory::Brace,
        MemberCategory::Column,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MemberCategory::Beam => "beam",
            MemberCategory::Brace => "brace",
            MemberCategory::Column => "column",
        }
    }
}

impl Display for MemberCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// End joints of one frame, as read from a connectivity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberEnds {
    pub frame_id: i64,
    pub joint_i: i64,
    pub joint_j: i64,
}

impl MemberEnds {
    pub fn tagged(self, category: MemberCategory) -> ConnectivityEdge {
        ConnectivityEdge {
            frame_id: self.frame_id,
            joint_i: self.joint_i,
            joint_j: self.joint_j,
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityEdge {
    pub frame_id: i64,
    pub joint_i: i64,
    pub joint_j: i64,
    pub category: MemberCategory,
}

/// Frame id to section label, as assigned in the source tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAssignment {
    pub frame_id: i64,
    pub label: String,
}

/// Tubular section geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperty {
    pub label: String,
    /// Outside diameter [m]
    pub outer_diameter: f64,
    /// Wall thickness [m]
    pub wall_thickness: f64,
    /// Material name from the source tool, informational only
    pub material: Option<String>,
}

/// One section plus the run's material, referenced by members.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub section: String,
    pub outer_diameter: f64,
    pub wall_thickness: f64,
    pub material: MaterialConstants,
}

impl Group {
    pub fn from_section(section: &SectionProperty, material: MaterialConstants) -> Self {
        Self {
            name: group_name(&section.label),
            section: section.label.clone(),
            outer_diameter: section.outer_diameter,
            wall_thickness: section.wall_thickness,
            material,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub frame_id: i64,
    pub joint_i: i64,
    pub joint_j: i64,
    pub category: MemberCategory,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledModel {
    pub nodes: Vec<Node>,
    pub groups: Vec<Group>,
    pub members: Vec<Member>,
    /// Every label that appears in the section assignments.
    pub used_labels: BTreeSet<String>,
}

impl AssembledModel {
    pub fn mudline_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_on_mudline())
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn members_in(&self, category: MemberCategory) -> usize {
        self.members
            .iter()
            .filter(|m| m.category == category)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_tags_use_single_letter_prefix() {
        assert_eq!(joint_tag(12), "J12");
        assert_eq!(Node::new(-3, 0.0, 0.0, 0.0).tag(), "J-3");
        assert_eq!(group_name("P1"), "P1_GRP");
    }

    #[test]
    fn mudline_tolerance_is_inclusive() {
        assert!(Node::new(1, 0.0, 0.0, 0.001).is_on_mudline());
        assert!(Node::new(2, 0.0, 0.0, -0.0005).is_on_mudline());
        assert!(!Node::new(3, 0.0, 0.0, 0.0011).is_on_mudline());
        assert!(!Node::new(4, 0.0, 0.0, -5.0).is_on_mudline());
    }

    #[test]
    fn ends_are_tagged_by_caller() {
        let ends = MemberEnds {
            frame_id: 10,
            joint_i: 1,
            joint_j: 2,
        };
        let edge = ends.tagged(MemberCategory::Brace);
        assert_eq!(edge.category, MemberCategory::Brace);
        assert_eq!(edge.frame_id, 10);
        assert_eq!(MemberCategory::Column.to_string(), "column");
    }
}
