//! Capture source abstraction for posebridge.
//!
//! A `CaptureSource` hands out one `VideoFrame` per call, blocking up to a
//! timeout. Frames live either in host memory or behind a `DeviceBuffer`
//! that knows how to copy itself back to the host.

pub mod config;
pub mod convert;
pub mod error;
pub mod traits;
pub mod videoframe;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::SourceConfig;
pub use error::VideoError;
pub use traits::{CaptureSource, SourceProvider};
pub use videoframe::{DeviceBuffer, FrameMemory, PixelFormat, VideoFrame};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Provider, V4l2Source};
