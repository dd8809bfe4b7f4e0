use crate::VideoError;
use posebridge_base::Vec2;
use std::fmt;

/// Pixel layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Bgr8,
    Rgba8,
    Yuyv,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Yuyv => 2,
        }
    }
}

/// Frame storage living in accelerator memory.
///
/// `copy_to_host` must be synchronous: when it returns, `dst` holds the
/// pixels and any pending device work on the buffer has completed.
pub trait DeviceBuffer: Send {
    /// Size of the buffer in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the whole buffer into `dst`, which is exactly `len()` bytes long.
    fn copy_to_host(&self, dst: &mut [u8]) -> Result<(), VideoError>;
}

pub enum FrameMemory {
    Host(Vec<u8>),
    Device(Box<dyn DeviceBuffer>),
}

impl fmt::Debug for FrameMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameMemory::Host(data) => write!(f, "Host({} bytes)", data.len()),
            FrameMemory::Device(buffer) => write!(f, "Device({} bytes)", buffer.len()),
        }
    }
}

/// One captured frame, tightly packed (no row padding).
#[derive(Debug)]
pub struct VideoFrame {
    size: Vec2<usize>,
    format: PixelFormat,
    memory: FrameMemory,
}

impl VideoFrame {
    /// Wrap host pixels; `data` must hold exactly `width * height * bytes_per_pixel` bytes.
    pub fn host(size: Vec2<usize>, format: PixelFormat, data: Vec<u8>) -> Result<Self, VideoError> {
        Self::new(size, format, FrameMemory::Host(data))
    }

    /// Wrap a device-resident buffer with the same length rule as `host`.
    pub fn device(
        size: Vec2<usize>,
        format: PixelFormat,
        buffer: Box<dyn DeviceBuffer>,
    ) -> Result<Self, VideoError> {
        Self::new(size, format, FrameMemory::Device(buffer))
    }

    fn new(size: Vec2<usize>, format: PixelFormat, memory: FrameMemory) -> Result<Self, VideoError> {
        let expected = size
            .x
            .checked_mul(size.y)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(|| VideoError::Format(format!("frame size {:?} overflows", size)))?;
        let got = match &memory {
            FrameMemory::Host(data) => data.len(),
            FrameMemory::Device(buffer) => buffer.len(),
        };
        if expected != got {
            return Err(VideoError::FrameSize { expected, got });
        }
        Ok(Self {
            size,
            format,
            memory,
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn memory(&self) -> &FrameMemory {
        &self.memory
    }

    pub fn byte_len(&self) -> usize {
        self.size.area() * self.format.bytes_per_pixel()
    }

    pub fn is_device_resident(&self) -> bool {
        matches!(self.memory, FrameMemory::Device(_))
    }

    /// Host pixels, if the frame is not on the device.
    pub fn host_data(&self) -> Option<&[u8]> {
        match &self.memory {
            FrameMemory::Host(data) => Some(data),
            FrameMemory::Device(_) => None,
        }
    }

    /// Copy the pixels into the front of `dst`, returning the number of bytes written.
    ///
    /// Device frames go through `DeviceBuffer::copy_to_host`. `dst` shorter
    /// than the frame is an error and leaves `dst` untouched.
    pub fn copy_to(&self, dst: &mut [u8]) -> Result<usize, VideoError> {
        let len = self.byte_len();
        if dst.len() < len {
            return Err(VideoError::FrameSize {
                expected: len,
                got: dst.len(),
            });
        }
        match &self.memory {
            FrameMemory::Host(data) => dst[..len].copy_from_slice(data),
            FrameMemory::Device(buffer) => buffer.copy_to_host(&mut dst[..len])?,
        }
        Ok(len)
    }
}
