pub mod backend;
pub mod device;
pub mod engine;
pub mod error;
pub mod modelpaths;
pub mod pose;

pub use backend::Backend;
pub use device::Device;
pub use engine::PoseEngine;
pub use error::InferError;
pub use modelpaths::ModelPaths;
pub use pose::{Joint, JointLayout, Keypoint, Subject, JOINT_COUNT};
