#![allow(dead_code)]

use posebridge::{Session, SessionConfig};
use posebridge_base::{Vec2, Vec3};
use posebridge_infer::{
    Backend, Device, InferError, JointLayout, Keypoint, ModelPaths, PoseEngine, Subject,
};
use posebridge_video::{
    CaptureSource, DeviceBuffer, PixelFormat, SourceConfig, SourceProvider, VideoError,
    VideoFrame,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FRAME_WIDTH: usize = 4;
pub const FRAME_HEIGHT: usize = 2;
pub const FRAME_BYTES: usize = FRAME_WIDTH * FRAME_HEIGHT * 3;
pub const FRAME_FILL: u8 = 0x7f;
pub const DEVICE_FILL: u8 = 0x42;

/// What the mock source does on each capture call. An exhausted script
/// keeps delivering default frames.
#[derive(Debug, Clone)]
pub enum Capture {
    Frame { width: usize, height: usize, fill: u8 },
    DeviceFrame,
    FailingDeviceFrame,
    Timeout,
    /// Error while the source keeps streaming.
    Glitch,
    /// Source ends cleanly.
    End,
    /// Source errors and stops streaming.
    Lost,
}

impl Capture {
    pub fn frame() -> Self {
        Capture::Frame {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            fill: FRAME_FILL,
        }
    }

    pub fn filled(fill: u8) -> Self {
        Capture::Frame {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            fill,
        }
    }

    pub fn sized(width: usize, height: usize) -> Self {
        Capture::Frame {
            width,
            height,
            fill: FRAME_FILL,
        }
    }
}

/// What the mock engine returns on each inference. An exhausted script
/// keeps returning one full skeleton.
#[derive(Debug, Clone)]
pub enum Infer {
    Subjects(Vec<Subject>),
    Fail,
    Panic,
}

/// Counters shared between a test and its mocks.
#[derive(Debug, Default)]
pub struct Probe {
    pub loads: usize,
    pub aux_files: Vec<String>,
    pub opened: Vec<String>,
    pub closes: usize,
    pub infers: usize,
    pub engines_dropped: usize,
    pub device_copies: usize,
}

pub type SharedProbe = Arc<Mutex<Probe>>;

pub fn probe() -> SharedProbe {
    Arc::new(Mutex::new(Probe::default()))
}

/// Dense 18-joint subject; joint `i` sits at (i + offset, 2i) with confidence 0.9.
pub fn full_subject(offset: f32) -> Subject {
    Subject::from_dense((0..18).map(|i| (Vec3::new(i as f32 + offset, i as f32 * 2.0, 0.0), 0.9)))
}

pub fn keypoint(joint: usize, x: f32, y: f32, confidence: f32) -> Keypoint {
    Keypoint {
        joint,
        position: Vec3::new(x, y, 0.0),
        confidence,
    }
}

pub struct MockEngine {
    layout: JointLayout,
    script: VecDeque<Infer>,
    probe: SharedProbe,
}

impl PoseEngine for MockEngine {
    fn layout(&self) -> JointLayout {
        self.layout
    }

    fn infer(&mut self, _frame: &VideoFrame) -> Result<Vec<Subject>, InferError> {
        self.probe.lock().unwrap().infers += 1;
        match self.script.pop_front() {
            Some(Infer::Subjects(subjects)) => Ok(subjects),
            Some(Infer::Fail) => Err(InferError::Runtime("kernel launch failed".to_string())),
            Some(Infer::Panic) => panic!("engine exploded"),
            None => Ok(vec![full_subject(0.0)]),
        }
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        if let Ok(mut probe) = self.probe.lock() {
            probe.engines_dropped += 1;
        }
    }
}

/// Loads `MockEngine`s. A model named `missing.onnx` fails to load.
pub struct MockBackend {
    name: &'static str,
    layout: JointLayout,
    script: Mutex<Vec<Infer>>,
    probe: SharedProbe,
}

impl MockBackend {
    pub fn new(probe: &SharedProbe) -> Self {
        Self::named("mock", probe)
    }

    pub fn named(name: &'static str, probe: &SharedProbe) -> Self {
        Self {
            name,
            layout: JointLayout::Canonical18,
            script: Mutex::new(Vec::new()),
            probe: probe.clone(),
        }
    }

    pub fn with_layout(mut self, layout: JointLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_script(self, script: Vec<Infer>) -> Self {
        *self.script.lock().unwrap() = script;
        self
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn load_model(
        &self,
        model: &ModelPaths,
        _device: &Device,
    ) -> Result<Box<dyn PoseEngine>, InferError> {
        if model.model().ends_with("missing.onnx") {
            return Err(InferError::ModelNotFound(model.model().display().to_string()));
        }
        let mut probe = self.probe.lock().unwrap();
        probe.loads += 1;
        probe.aux_files = model
            .aux()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        drop(probe);

        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::new(MockEngine {
            layout: self.layout,
            script: script.into(),
            probe: self.probe.clone(),
        }))
    }
}

struct MockDeviceBuffer {
    len: usize,
    fail: bool,
    probe: SharedProbe,
}

impl DeviceBuffer for MockDeviceBuffer {
    fn len(&self) -> usize {
        self.len
    }

    fn copy_to_host(&self, dst: &mut [u8]) -> Result<(), VideoError> {
        if self.fail {
            return Err(VideoError::Transfer("device lost".to_string()));
        }
        self.probe.lock().unwrap().device_copies += 1;
        dst.fill(DEVICE_FILL);
        Ok(())
    }
}

pub struct MockSource {
    script: VecDeque<Capture>,
    streaming: bool,
    probe: SharedProbe,
}

impl MockSource {
    fn device_frame(&self, fail: bool) -> Result<Option<VideoFrame>, VideoError> {
        let buffer = MockDeviceBuffer {
            len: FRAME_BYTES,
            fail,
            probe: self.probe.clone(),
        };
        VideoFrame::device(
            Vec2::new(FRAME_WIDTH, FRAME_HEIGHT),
            PixelFormat::Rgb8,
            Box::new(buffer),
        )
        .map(Some)
    }
}

impl CaptureSource for MockSource {
    fn capture(&mut self, _timeout: Duration) -> Result<Option<VideoFrame>, VideoError> {
        if !self.streaming {
            return Err(VideoError::Stream("source closed".to_string()));
        }
        match self.script.pop_front().unwrap_or_else(Capture::frame) {
            Capture::Frame {
                width,
                height,
                fill,
            } => VideoFrame::host(
                Vec2::new(width, height),
                PixelFormat::Rgb8,
                vec![fill; width * height * 3],
            )
            .map(Some),
            Capture::DeviceFrame => self.device_frame(false),
            Capture::FailingDeviceFrame => self.device_frame(true),
            Capture::Timeout => Ok(None),
            Capture::Glitch => Err(VideoError::Stream("dropped buffer".to_string())),
            Capture::End => {
                self.streaming = false;
                Ok(None)
            }
            Capture::Lost => {
                self.streaming = false;
                Err(VideoError::Stream("device unplugged".to_string()))
            }
        }
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn close(&mut self) {
        self.probe.lock().unwrap().closes += 1;
        self.streaming = false;
    }
}

/// Opens `MockSource`s. The URI `/dev/busy` fails to open.
pub struct MockProvider {
    name: &'static str,
    script: Mutex<Vec<Capture>>,
    probe: SharedProbe,
}

impl MockProvider {
    pub fn new(probe: &SharedProbe) -> Self {
        Self::named("mock", probe)
    }

    pub fn named(name: &'static str, probe: &SharedProbe) -> Self {
        Self {
            name,
            script: Mutex::new(Vec::new()),
            probe: probe.clone(),
        }
    }

    pub fn with_script(self, script: Vec<Capture>) -> Self {
        *self.script.lock().unwrap() = script;
        self
    }
}

impl SourceProvider for MockProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn open(&self, config: &SourceConfig) -> Result<Box<dyn CaptureSource>, VideoError> {
        if config.uri() == "/dev/busy" {
            return Err(VideoError::Device("/dev/busy: device or resource busy".to_string()));
        }
        self.probe.lock().unwrap().opened.push(config.uri().to_string());
        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::new(MockSource {
            script: script.into(),
            streaming: true,
            probe: self.probe.clone(),
        }))
    }
}

/// Uninitialized session over scripted mocks.
pub fn session(
    config: SessionConfig,
    captures: Vec<Capture>,
    infers: Vec<Infer>,
) -> (Session, SharedProbe) {
    let probe = probe();
    let backend = MockBackend::new(&probe).with_script(infers);
    let provider = MockProvider::new(&probe).with_script(captures);
    let session = Session::new(config, Arc::new(backend), Arc::new(provider)).unwrap();
    (session, probe)
}

/// Session already initialized and capturing from `/dev/video0`.
pub fn capturing_session(
    config: SessionConfig,
    captures: Vec<Capture>,
    infers: Vec<Infer>,
) -> (Session, SharedProbe) {
    let (mut session, probe) = session(config, captures, infers);
    session.initialize(&ModelPaths::new("pose.onnx")).unwrap();
    session.start("/dev/video0").unwrap();
    (session, probe)
}
