mod layout;
mod types;

pub use layout::JointLayout;
pub use types::{Joint, Keypoint, Subject, JOINT_COUNT};
