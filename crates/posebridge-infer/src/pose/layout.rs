use super::types::Joint;
use serde::{Deserialize, Serialize};

/// Keypoint ordering used by a vendor network, and its mapping onto `Joint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointLayout {
    /// COCO-17 plus neck at 17 (Jetson poseNet body networks). Identity mapping.
    Canonical18,
    /// COCO-17 (YOLO-pose style). Identity for 0..17; no neck.
    Coco17,
    /// 18-joint OpenPose order (stereo camera BODY_18).
    Body18,
}

// OpenPose order: nose, neck, right arm, left arm, right leg, left leg, eyes, ears
const BODY18_TO_CANONICAL: [Joint; 18] = [
    Joint::Nose,
    Joint::Neck,
    Joint::RightShoulder,
    Joint::RightElbow,
    Joint::RightWrist,
    Joint::LeftShoulder,
    Joint::LeftElbow,
    Joint::LeftWrist,
    Joint::RightHip,
    Joint::RightKnee,
    Joint::RightAnkle,
    Joint::LeftHip,
    Joint::LeftKnee,
    Joint::LeftAnkle,
    Joint::RightEye,
    Joint::LeftEye,
    Joint::RightEar,
    Joint::LeftEar,
];

impl JointLayout {
    /// How many joint ids the vendor layout defines.
    pub fn vendor_joint_count(&self) -> usize {
        match self {
            JointLayout::Canonical18 | JointLayout::Body18 => 18,
            JointLayout::Coco17 => 17,
        }
    }

    /// Canonical slot for a vendor joint id, `None` for ids outside the layout.
    pub fn canonical(&self, vendor_joint: usize) -> Option<Joint> {
        match self {
            JointLayout::Canonical18 => Joint::try_from(vendor_joint).ok(),
            JointLayout::Coco17 if vendor_joint < 17 => Joint::try_from(vendor_joint).ok(),
            JointLayout::Coco17 => None,
            JointLayout::Body18 => BODY18_TO_CANONICAL.get(vendor_joint).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JOINT_COUNT;
    use std::collections::HashSet;

    #[test]
    fn test_body18_is_a_permutation() {
        let slots: HashSet<Joint> = (0..18)
            .filter_map(|id| JointLayout::Body18.canonical(id))
            .collect();
        assert_eq!(slots.len(), JOINT_COUNT);
    }

    #[test]
    fn test_coco17_has_no_neck() {
        let has_neck = (0..JointLayout::Coco17.vendor_joint_count())
            .any(|id| JointLayout::Coco17.canonical(id) == Some(Joint::Neck));
        assert!(!has_neck);
    }
}
