//! Joins connectivity, section assignments and section geometry into members.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    AssembledModel, ConnectivityEdge, Group, MaterialConstants, Member, MemberCategory,
    MemberEnds, Node, SectionAssignment, SectionProperty,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error(
        "{count} members without a mapped group: check frame assignments and sections \
         (labels without section: {labels:?})"
    )]
    UnresolvedMembers {
        count: usize,
        /// Frames that found no group, in connectivity order.
        frame_ids: Vec<i64>,
        /// Assigned labels that have no section definition, sorted.
        labels: Vec<String>,
    },
}

/// Everything the readers produced for one run.
#[derive(Debug, Clone, Default)]
pub struct AssemblyInputs {
    pub nodes: Vec<Node>,
    /// Connectivity per category, concatenated in the given order.
    pub connectivity: Vec<(MemberCategory, Vec<MemberEnds>)>,
    pub assignments: Vec<SectionAssignment>,
    pub sections: Vec<SectionProperty>,
    pub material: MaterialConstants,
}

impl AssembledModel {
    /// Builds groups for the referenced sections and resolves every edge to one.
    ///
    /// Endpoint joints are not checked against `nodes`; a member pointing at a
    /// missing joint is written as-is.
    pub fn assemble(inputs: AssemblyInputs) -> Result<Self, AssemblyError> {
        let AssemblyInputs {
            nodes,
            connectivity,
            assignments,
            sections,
            material,
        } = inputs;

        let edges: Vec<ConnectivityEdge> = connectivity
            .into_iter()
            .flat_map(|(category, ends)| ends.into_iter().map(move |e| e.tagged(category)))
            .collect();

        let used_labels: BTreeSet<String> =
            assignments.iter().map(|a| a.label.clone()).collect();

        let groups = derive_groups(&sections, &used_labels, material);

        let mut label_by_frame = HashMap::<i64, &str>::new();
        for assignment in &assignments {
            label_by_frame
                .entry(assignment.frame_id)
                .or_insert(assignment.label.as_str());
        }
        let group_by_label: HashMap<&str, &str> = groups
            .iter()
            .map(|g| (g.section.as_str(), g.name.as_str()))
            .collect();

        let mut members = Vec::with_capacity(edges.len());
        let mut unresolved_frames = Vec::new();
        let mut unresolved_labels = BTreeSet::new();

        for edge in &edges {
            let label = label_by_frame.get(&edge.frame_id).copied();
            match label.and_then(|l| group_by_label.get(l).copied()) {
                Some(group) => members.push(Member {
                    frame_id: edge.frame_id,
                    joint_i: edge.joint_i,
                    joint_j: edge.joint_j,
                    category: edge.category,
                    group: group.to_string(),
                }),
                None => {
                    unresolved_frames.push(edge.frame_id);
                    if let Some(l) = label {
                        unresolved_labels.insert(l.to_string());
                    }
                }
            }
        }

        if !unresolved_frames.is_empty() {
            return Err(AssemblyError::UnresolvedMembers {
                count: unresolved_frames.len(),
                frame_ids: unresolved_frames,
                labels: unresolved_labels.into_iter().collect(),
            });
        }

        info!(
            nodes = nodes.len(),
            groups = groups.len(),
            members = members.len(),
            "model assembled"
        );

        Ok(Self {
            nodes,
            groups,
            members,
            used_labels,
        })
    }
}

/// One group per referenced section, in section-table order. A label defined
/// twice keeps its first definition.
fn derive_groups(
    sections: &[SectionProperty],
    used_labels: &BTreeSet<String>,
    material: MaterialConstants,
) -> Vec<Group> {
    let mut seen = HashSet::<&str>::new();
    let mut groups = Vec::new();
    for section in sections {
        if !used_labels.contains(&section.label) {
            continue;
        }
        if !seen.insert(section.label.as_str()) {
            debug!(label = %section.label, "ignoring repeated section definition");
            continue;
        }
        groups.push(Group::from_section(section, material));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ends(frame_id: i64, joint_i: i64, joint_j: i64) -> MemberEnds {
        MemberEnds {
            frame_id,
            joint_i,
            joint_j,
        }
    }

    fn assign(frame_id: i64, label: &str) -> SectionAssignment {
        SectionAssignment {
            frame_id,
            label: label.to_string(),
        }
    }

    fn pipe(label: &str, od: f64, t: f64) -> SectionProperty {
        SectionProperty {
            label: label.to_string(),
            outer_diameter: od,
            wall_thickness: t,
            material: Some("A992Fy50".to_string()),
        }
    }

    fn inputs() -> AssemblyInputs {
        AssemblyInputs {
            nodes: vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 0.0, 0.0, 5.0)],
            connectivity: vec![
                (MemberCategory::Beam, vec![ends(10, 1, 2)]),
                (MemberCategory::Brace, vec![ends(11, 2, 1)]),
                (MemberCategory::Column, vec![]),
            ],
            assignments: vec![assign(10, "P1"), assign(11, "P2")],
            sections: vec![
                pipe("P1", 0.5, 0.02),
                pipe("UNUSED", 1.0, 0.05),
                pipe("P2", 0.3, 0.01),
            ],
            material: MaterialConstants::default(),
        }
    }

    #[test]
    fn groups_cover_only_assigned_and_defined_sections() {
        let model = AssembledModel::assemble(inputs()).expect("assembly should succeed");
        let names: Vec<&str> = model.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["P1_GRP", "P2_GRP"]);
        assert!(model.group("UNUSED_GRP").is_none());
        assert_eq!(model.group("P1_GRP").map(|g| g.outer_diameter), Some(0.5));
    }

    #[test]
    fn members_follow_category_order_and_resolve_groups() {
        let model = AssembledModel::assemble(inputs()).expect("assembly should succeed");
        assert_eq!(model.members.len(), 2);
        assert_eq!(model.members[0].group, "P1_GRP");
        assert_eq!(model.members[0].category, MemberCategory::Beam);
        assert_eq!(model.members[1].group, "P2_GRP");
        assert_eq!(model.members[1].category, MemberCategory::Brace);
        assert_eq!(model.members_in(MemberCategory::Column), 0);
    }

    #[test]
    fn material_is_applied_to_every_group() {
        let mut input = inputs();
        input.material.density = 7800.0;
        let model = AssembledModel::assemble(input).expect("assembly should succeed");
        assert!(model.groups.iter().all(|g| g.material.density == 7800.0));
    }

    #[test]
    fn used_labels_include_assignments_without_members() {
        let mut input = inputs();
        input.assignments.push(assign(99, "P9"));
        let model = AssembledModel::assemble(input).expect("unreferenced frames are fine");
        assert!(model.used_labels.contains("P9"));
        assert_eq!(model.groups.len(), 2);
    }

    #[test]
    fn reports_exact_count_of_unresolved_members() {
        let mut input = inputs();
        input.connectivity[2].1 = vec![ends(12, 1, 2), ends(13, 2, 1)];
        input.assignments.push(assign(12, "MISSING"));

        let err = AssembledModel::assemble(input).expect_err("unresolved members must fail");
        let AssemblyError::UnresolvedMembers {
            count,
            frame_ids,
            labels,
        } = &err;
        assert_eq!(*count, 2);
        assert_eq!(frame_ids, &vec![12, 13]);
        assert_eq!(labels, &vec!["MISSING".to_string()]);
        assert!(err.to_string().starts_with("2 members without a mapped group"));
        assert!(err.to_string().contains("\"MISSING\""));
    }

    #[test]
    fn first_assignment_and_first_section_win() {
        let mut input = inputs();
        input.assignments.push(assign(10, "P2"));
        input.sections.push(pipe("P1", 9.9, 0.9));

        let model = AssembledModel::assemble(input).expect("duplicates are tolerated");
        assert_eq!(model.members[0].group, "P1_GRP");
        assert_eq!(model.groups.len(), 2);
        assert_eq!(model.group("P1_GRP").map(|g| g.outer_diameter), Some(0.5));
    }

    #[test]
    fn dangling_joints_are_not_validated() {
        let mut input = inputs();
        input.connectivity[0].1.push(ends(14, 1, 404));
        input.assignments.push(assign(14, "P1"));

        let model = AssembledModel::assemble(input).expect("endpoints are not checked");
        assert!(model.members.iter().any(|m| m.joint_j == 404));
    }
}
