//! Single-person pose estimation behind a flat C ABI.
//!
//! A [`Session`] owns one inference engine, one capture source and one
//! fixed-capacity frame buffer, and walks them through
//! initialize → start → step* → stop → shutdown. Engines and sources are
//! supplied by vendor backends through the traits in `posebridge-infer` and
//! `posebridge-video`; the C entry points live in [`ffi`].
//!
//! Only the first detected subject is reported per frame. Other people in the
//! scene are counted in `subject_count` but their keypoints are dropped.

pub mod config;
pub mod error;
pub mod ffi;
pub mod framebuffer;
pub mod marshal;
pub mod registry;
pub mod session;

pub use config::SessionConfig;
pub use error::{ConfigError, PoseError, PoseStatus};
pub use framebuffer::FrameBuffer;
pub use marshal::{PoseKeypoint, Skeleton, StepResult};
pub use registry::{create_registry, register_backend, register_provider, Registry};
pub use session::{Session, SessionState};

pub use posebridge_infer::{Backend, Device, Joint, JointLayout, ModelPaths, PoseEngine, JOINT_COUNT};
pub use posebridge_video::{CaptureSource, SourceConfig, SourceProvider};
