use crate::{InferError, JointLayout, Subject};
use posebridge_video::VideoFrame;

/// A loaded pose network.
///
/// `infer` is synchronous: any asynchronous device work is complete when it
/// returns. Subjects come back in the engine's own order and joint ids are
/// in the engine's `layout`.
pub trait PoseEngine: Send {
    fn layout(&self) -> JointLayout;
    fn infer(&mut self, frame: &VideoFrame) -> Result<Vec<Subject>, InferError>;
}
