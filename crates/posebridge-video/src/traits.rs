use crate::{SourceConfig, VideoError, VideoFrame};
use std::time::Duration;

/// An open camera or video stream.
///
/// All calls block the caller's thread; there is no background capture.
pub trait CaptureSource: Send {
    /// Wait up to `timeout` for the next frame.
    ///
    /// `Ok(None)` means no frame arrived in time. Whether that is transient
    /// or the end of the stream is answered by `is_streaming`.
    fn capture(&mut self, timeout: Duration) -> Result<Option<VideoFrame>, VideoError>;

    /// False once the source has ended or lost its device.
    fn is_streaming(&self) -> bool;

    /// Release the device. Further captures fail.
    fn close(&mut self);
}

/// Opens capture sources by URI (e.g. `/dev/video0`, `file:///clip.mp4`).
pub trait SourceProvider: Send + Sync {
    fn name(&self) -> &str;
    fn open(&self, config: &SourceConfig) -> Result<Box<dyn CaptureSource>, VideoError>;
}
