use crate::{
    CaptureSource, PixelFormat, SourceConfig, SourceProvider, VideoError, VideoFrame,
    convert::yuyv_to_rgb,
};
use posebridge_base::Vec2;
use std::io::ErrorKind;
use std::time::Duration;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

const URI_SCHEME: &str = "v4l2://";

/// Opens `V4l2Source`s for `/dev/videoN` paths or `v4l2:///dev/videoN` URIs.
pub struct V4l2Provider;

impl SourceProvider for V4l2Provider {
    fn name(&self) -> &str {
        "v4l2"
    }

    fn open(&self, config: &SourceConfig) -> Result<Box<dyn CaptureSource>, VideoError> {
        Ok(Box::new(V4l2Source::open(config)?))
    }
}

/// V4L2 webcam delivering RGB8 frames converted from YUYV.
pub struct V4l2Source {
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for V4l2Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Source")
            .field("stream", &self.stream.is_some())
            .field("size", &self.size)
            .finish()
    }
}

impl V4l2Source {
    /// Open the device, negotiate YUYV at the requested size and start streaming.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Device` if the device cannot be opened or does
    /// not accept YUYV, `VideoError::Stream` if the buffers cannot be mapped.
    pub fn open(config: &SourceConfig) -> Result<Self, VideoError> {
        let path = config.uri().strip_prefix(URI_SCHEME).unwrap_or(config.uri());
        let device = Device::with_path(path)?;

        let current = Capture::format(&device)?;
        let (width, height) = config.size().unwrap_or((current.width, current.height));
        let format = Capture::set_format(&device, &Format::new(width, height, FourCC::new(b"YUYV")))?;
        if format.fourcc != FourCC::new(b"YUYV") {
            return Err(VideoError::Device(format!(
                "{} does not support YUYV (offered {})",
                path, format.fourcc
            )));
        }

        if let Some(fps) = config.fps() {
            let params = v4l::video::capture::Parameters::with_fps(fps);
            Capture::set_params(&device, &params)?;
        }

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, config.buffer_count())
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        log::info!(
            "v4l2: opened {} at {}x{} with {} buffers",
            path,
            format.width,
            format.height,
            config.buffer_count()
        );

        Ok(Self {
            stream: Some(stream),
            size: Vec2::new(format.width as usize, format.height as usize),
            timeout: None,
        })
    }
}

impl CaptureSource for V4l2Source {
    fn capture(&mut self, timeout: Duration) -> Result<Option<VideoFrame>, VideoError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::Stream("stream closed".to_string()))?;

        if self.timeout != Some(timeout) {
            stream.set_timeout(timeout);
            self.timeout = Some(timeout);
        }

        let yuyv = match CaptureStream::next(stream) {
            // the mapped buffer is only valid until the next dequeue
            Ok((data, _metadata)) => data.to_vec(),
            Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(None),
            Err(e) => {
                log::error!("v4l2: capture failed, closing stream: {}", e);
                self.stream = None;
                return Err(VideoError::Stream(e.to_string()));
            }
        };

        let rgb = yuyv_to_rgb(&yuyv, self.size).ok_or_else(|| VideoError::FrameSize {
            expected: self.size.area() * 2,
            got: yuyv.len(),
        })?;
        VideoFrame::host(self.size, PixelFormat::Rgb8, rgb).map(Some)
    }

    fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) {
        self.stream = None;
    }
}
