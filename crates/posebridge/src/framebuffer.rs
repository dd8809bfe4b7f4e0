use crate::PoseError;
use posebridge_base::Vec2;
use posebridge_video::{PixelFormat, VideoFrame};

/// Fixed-capacity host buffer holding the most recent frame.
///
/// Allocated once per session and never resized, so a pointer to it stays
/// valid for the lifetime of the session. Its contents are overwritten by
/// every step that copies a frame.
pub struct FrameBuffer {
    data: Box<[u8]>,
    len: usize,
    size: Vec2<usize>,
    format: Option<PixelFormat>,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            size: Vec2::zero(),
            format: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Valid bytes of the last stored frame.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.map(|f| f.bytes_per_pixel()).unwrap_or(0)
    }

    pub fn fits(&self, frame: &VideoFrame) -> bool {
        frame.byte_len() <= self.capacity()
    }

    /// Pixels of the last stored frame.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Start of the buffer; non-null whenever the capacity is non-zero.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Copy `frame` into the buffer, synchronizing device frames to host.
    pub fn store(&mut self, frame: &VideoFrame) -> Result<(), PoseError> {
        if !self.fits(frame) {
            return Err(PoseError::FrameTooLarge {
                frame_bytes: frame.byte_len(),
                capacity: self.capacity(),
            });
        }
        let len = frame
            .copy_to(&mut self.data)
            .map_err(|e| PoseError::Capture(format!("frame transfer failed: {e}")))?;
        self.len = len;
        self.size = frame.size();
        self.format = Some(frame.format());
        Ok(())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("size", &self.size)
            .field("format", &self.format)
            .finish()
    }
}
