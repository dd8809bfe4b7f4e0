use posebridge_base::Vec3;

/// Number of joints in the canonical body layout.
pub const JOINT_COUNT: usize = 18;

/// Canonical joint slots: COCO-17 order with the neck appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
    Neck = 17,
}

impl Joint {
    /// Every joint in slot order.
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::Neck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftEye => "left_eye",
            Joint::RightEye => "right_eye",
            Joint::LeftEar => "left_ear",
            Joint::RightEar => "right_ear",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::Neck => "neck",
        }
    }

    pub fn from_name(name: &str) -> Option<Joint> {
        Joint::ALL.iter().copied().find(|joint| joint.name() == name)
    }
}

impl From<Joint> for usize {
    fn from(joint: Joint) -> usize {
        joint as usize
    }
}

impl TryFrom<usize> for Joint {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Joint::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid joint index: {}. Must be in range 0-{}.",
                value,
                JOINT_COUNT - 1
            )
        })
    }
}

/// One keypoint as reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Joint id in the engine's layout (not necessarily canonical).
    pub joint: usize,
    /// Image coordinates for 2D engines (z = 0), world coordinates for 3D ones.
    pub position: Vec3<f32>,
    /// Detection confidence in [0.0, 1.0].
    pub confidence: f32,
}

/// One detected person.
///
/// Engines may list only the keypoints they found, in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subject {
    pub keypoints: Vec<Keypoint>,
}

impl Subject {
    /// Build a subject from a dense list where the list index is the joint id.
    pub fn from_dense(points: impl IntoIterator<Item = (Vec3<f32>, f32)>) -> Self {
        Self {
            keypoints: points
                .into_iter()
                .enumerate()
                .map(|(joint, (position, confidence))| Keypoint {
                    joint,
                    position,
                    confidence,
                })
                .collect(),
        }
    }
}
