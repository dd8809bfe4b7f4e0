use crate::FrameBuffer;
use posebridge_infer::{Joint, JointLayout, Subject, JOINT_COUNT};

/// One keypoint in a canonical slot. Unpopulated slots are all zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseKeypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub confidence: f32,
}

/// Keypoints of the first subject, in canonical slot order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skeleton {
    pub keypoints: [PoseKeypoint; JOINT_COUNT],
    pub detected: usize,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            keypoints: [PoseKeypoint::default(); JOINT_COUNT],
            detected: 0,
        }
    }
}

/// Place the first subject's keypoints into canonical slots.
///
/// Keypoints are routed by their vendor joint id through `layout`; ids the
/// layout does not know and keypoints below `min_confidence` are dropped.
/// When a slot is reported twice the more confident keypoint wins.
pub fn first_subject(subjects: &[Subject], layout: JointLayout, min_confidence: f32) -> Skeleton {
    let mut skeleton = Skeleton::default();
    let Some(subject) = subjects.first() else {
        return skeleton;
    };

    let mut filled = [false; JOINT_COUNT];
    for keypoint in &subject.keypoints {
        let Some(joint) = layout.canonical(keypoint.joint) else {
            continue;
        };
        if keypoint.confidence.is_nan() || keypoint.confidence < min_confidence {
            continue;
        }
        let slot = usize::from(joint);
        if filled[slot] && skeleton.keypoints[slot].confidence >= keypoint.confidence {
            continue;
        }
        skeleton.keypoints[slot] = PoseKeypoint {
            x: keypoint.position.x,
            y: keypoint.position.y,
            z: keypoint.position.z,
            confidence: keypoint.confidence,
        };
        filled[slot] = true;
    }
    skeleton.detected = filled.iter().filter(|&&f| f).count();
    skeleton
}

/// Output of one `Session::step`.
///
/// Borrows the session's frame buffer, so it must be dropped before the next
/// step.
#[derive(Debug)]
pub struct StepResult<'a> {
    /// People detected in the frame, including those not reported.
    pub subject_count: usize,
    /// First subject only.
    pub keypoints: [PoseKeypoint; JOINT_COUNT],
    pub detected_keypoint_count: usize,
    /// Number of frames captured since `start`, including frames rejected as too
    /// large or failing inference; unchanged when no frame arrived.
    pub frame_number: u64,
    pub frame: &'a FrameBuffer,
}

impl<'a> StepResult<'a> {
    pub(crate) fn new(
        subject_count: usize,
        skeleton: Skeleton,
        frame_number: u64,
        frame: &'a FrameBuffer,
    ) -> Self {
        Self {
            subject_count,
            keypoints: skeleton.keypoints,
            detected_keypoint_count: skeleton.detected,
            frame_number,
            frame,
        }
    }

    /// Result for a step that produced no frame.
    pub(crate) fn empty(frame_number: u64, frame: &'a FrameBuffer) -> Self {
        Self::new(0, Skeleton::default(), frame_number, frame)
    }

    pub fn keypoint(&self, joint: Joint) -> &PoseKeypoint {
        &self.keypoints[usize::from(joint)]
    }

    pub fn has_subject(&self) -> bool {
        self.subject_count > 0
    }
}
