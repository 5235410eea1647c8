// Bone-pair resolution for skeleton rendering

use crate::models::pose::{Bone, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A joint on one side of the body, matched against point labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointRef {
    pub joint: &'static str,
    pub side: Side,
}

const fn joint(side: Side, joint: &'static str) -> JointRef {
    JointRef { joint, side }
}

/// Anatomical pairs in draw order
pub const BONE_PAIRS: [(JointRef, JointRef); 12] = [
    (joint(Side::Left, "shoulder"), joint(Side::Left, "elbow")),
    (joint(Side::Left, "elbow"), joint(Side::Left, "wrist")),
    (joint(Side::Right, "shoulder"), joint(Side::Right, "elbow")),
    (joint(Side::Right, "elbow"), joint(Side::Right, "wrist")),
    (joint(Side::Left, "shoulder"), joint(Side::Right, "shoulder")),
    (joint(Side::Left, "shoulder"), joint(Side::Left, "hip")),
    (joint(Side::Right, "shoulder"), joint(Side::Right, "hip")),
    (joint(Side::Left, "hip"), joint(Side::Right, "hip")),
    (joint(Side::Left, "hip"), joint(Side::Left, "knee")),
    (joint(Side::Left, "knee"), joint(Side::Left, "ankle")),
    (joint(Side::Right, "hip"), joint(Side::Right, "knee")),
    (joint(Side::Right, "knee"), joint(Side::Right, "ankle")),
];

/// First point whose label mentions both the joint and the side, ignoring case
pub fn find_point<'a>(points: &'a [Point], joint: JointRef) -> Option<&'a Point> {
    points.iter().find(|p| {
        let label = p.label.to_lowercase();
        label.contains(joint.joint) && label.contains(joint.side.as_str())
    })
}

/// Bones for every pair whose two endpoints are present, in [`BONE_PAIRS`] order.
///
/// A missing point only removes the bones that reference it.
pub fn resolve_bones(points: &[Point]) -> Vec<Bone> {
    BONE_PAIRS
        .iter()
        .filter_map(|&(from, to)| {
            let from = find_point(points, from)?;
            let to = find_point(points, to)?;
            Some(Bone::between(from, to))
        })
        .collect()
}
