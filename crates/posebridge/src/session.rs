use crate::{marshal, registry, FrameBuffer, PoseError, SessionConfig, StepResult};
use posebridge_infer::{Backend, ModelPaths, PoseEngine};
use posebridge_video::{CaptureSource, SourceProvider, VideoError};
use std::sync::Arc;

/// Lifecycle of a [`Session`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized = 0,
    /// Engine loaded, no source open.
    Ready = 1,
    Capturing = 2,
    /// Source closed; the engine is still loaded and `start` may be called again.
    Stopped = 3,
    /// Terminal. Every operation except `shutdown` fails.
    Released = 4,
}

/// One pose estimation pipeline: engine, source and frame buffer.
///
/// ```text
/// Uninitialized --initialize--> Ready --start--> Capturing --stop--> Stopped
///                                                    ^                  |
///                                                    +------start-------+
/// any state --shutdown--> Released
/// ```
///
/// A session is single-threaded: every operation takes `&mut self`.
pub struct Session {
    config: SessionConfig,
    backend: Arc<dyn Backend>,
    provider: Arc<dyn SourceProvider>,
    engine: Option<Box<dyn PoseEngine>>,
    source: Option<Box<dyn CaptureSource>>,
    state: SessionState,
    frame_buffer: FrameBuffer,
    frame_number: u64,
}

impl Session {
    /// Create an uninitialized session. The frame buffer is allocated here.
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn Backend>,
        provider: Arc<dyn SourceProvider>,
    ) -> Result<Self, PoseError> {
        config.validate()?;
        log::debug!(
            "session: backend {}, provider {}, frame capacity {} bytes",
            backend.name(),
            provider.name(),
            config.frame_capacity()
        );
        Ok(Self {
            frame_buffer: FrameBuffer::new(config.frame_capacity()),
            config,
            backend,
            provider,
            engine: None,
            source: None,
            state: SessionState::Uninitialized,
            frame_number: 0,
        })
    }

    /// Create a session from collaborators in the process-wide registry.
    pub fn from_registry(
        config: SessionConfig,
        backend: &str,
        provider: &str,
    ) -> Result<Self, PoseError> {
        let (found_backend, found_provider) = {
            let registry = registry::global();
            (registry.backend(backend), registry.provider(provider))
        };
        let backend = found_backend
            .ok_or_else(|| PoseError::InvalidArgument(format!("unknown backend {backend}")))?;
        let provider = found_provider
            .ok_or_else(|| PoseError::InvalidArgument(format!("unknown source provider {provider}")))?;
        Self::new(config, backend, provider)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Buffer holding the last frame copied by `step`.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Frames captured since the last `start`, including frames rejected by `step`.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    fn invalid_state(&self, operation: &'static str) -> PoseError {
        log::warn!("session: {} rejected in state {:?}", operation, self.state);
        PoseError::InvalidState {
            operation,
            state: self.state,
        }
    }

    /// Load the pose model.
    ///
    /// Only valid once, from `Uninitialized`. On failure the session stays
    /// `Uninitialized` and may be retried.
    pub fn initialize(&mut self, model: &ModelPaths) -> Result<(), PoseError> {
        if self.state != SessionState::Uninitialized {
            return Err(self.invalid_state("initialize"));
        }

        log::info!(
            "session: loading {} with backend {} on {}",
            model.model().display(),
            self.backend.name(),
            self.config.device()
        );
        let engine = self
            .backend
            .load_model(model, self.config.device())
            .map_err(|e| {
                log::error!("session: model load failed: {}", e);
                PoseError::ModelLoad(e)
            })?;

        self.engine = Some(engine);
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Open a capture source and begin streaming.
    ///
    /// Valid from `Ready` or `Stopped`. On failure the state is unchanged.
    pub fn start(&mut self, uri: &str) -> Result<(), PoseError> {
        if !matches!(self.state, SessionState::Ready | SessionState::Stopped) {
            return Err(self.invalid_state("start"));
        }
        if uri.is_empty() {
            log::error!("session: cannot open an empty source uri");
            return Err(PoseError::SourceOpen(VideoError::Device(
                "empty source uri".to_string(),
            )));
        }

        let source_config = self.config.source().clone().with_uri(uri);
        let source = self.provider.open(&source_config).map_err(|e| {
            log::error!("session: cannot open {}: {}", uri, e);
            PoseError::SourceOpen(e)
        })?;

        log::info!("session: capturing from {} via {}", uri, self.provider.name());
        self.source = Some(source);
        self.frame_number = 0;
        self.state = SessionState::Capturing;
        Ok(())
    }

    /// Capture one frame, run inference and report the first subject.
    ///
    /// A timeout, or a capture error while the source is still streaming,
    /// gives an empty result rather than an error. Errors never change the
    /// state; after `PoseError::Capture` the caller should `stop` and may
    /// `start` again.
    pub fn step(&mut self) -> Result<StepResult<'_>, PoseError> {
        if self.state != SessionState::Capturing {
            return Err(self.invalid_state("step"));
        }
        let state = self.state;
        let (Some(engine), Some(source)) = (self.engine.as_mut(), self.source.as_mut()) else {
            return Err(PoseError::InvalidState {
                operation: "step",
                state,
            });
        };

        let timeout = self.config.capture_timeout();
        let frame = match source.capture(timeout) {
            Ok(Some(frame)) => frame,
            Ok(None) if source.is_streaming() => {
                log::debug!("session: no frame within {:?}", timeout);
                return Ok(StepResult::empty(self.frame_number, &self.frame_buffer));
            }
            Err(e) if source.is_streaming() => {
                log::warn!("session: capture error, source still streaming: {}", e);
                return Ok(StepResult::empty(self.frame_number, &self.frame_buffer));
            }
            Ok(None) => {
                log::error!("session: source stopped streaming");
                return Err(PoseError::Capture("source stopped streaming".to_string()));
            }
            Err(e) => {
                log::error!("session: source stopped streaming: {}", e);
                return Err(PoseError::Capture(e.to_string()));
            }
        };
        self.frame_number += 1;

        let frame_output = self.config.frame_output();
        if frame_output && !self.frame_buffer.fits(&frame) {
            log::error!(
                "session: frame {} is {} bytes, buffer holds {}",
                self.frame_number,
                frame.byte_len(),
                self.frame_buffer.capacity()
            );
            return Err(PoseError::FrameTooLarge {
                frame_bytes: frame.byte_len(),
                capacity: self.frame_buffer.capacity(),
            });
        }

        let subjects = engine.infer(&frame).map_err(|e| {
            log::error!("session: inference failed: {}", e);
            PoseError::Inference(e)
        })?;
        if subjects.len() > 1 {
            log::debug!("session: {} subjects, reporting the first", subjects.len());
        }
        let skeleton = marshal::first_subject(
            &subjects,
            engine.layout(),
            self.config.min_keypoint_confidence(),
        );

        if frame_output {
            self.frame_buffer.store(&frame)?;
        }

        Ok(StepResult::new(
            subjects.len(),
            skeleton,
            self.frame_number,
            &self.frame_buffer,
        ))
    }

    /// Close the capture source. Outside `Capturing` this does nothing.
    pub fn stop(&mut self) {
        if self.state != SessionState::Capturing {
            log::debug!("session: stop ignored in state {:?}", self.state);
            return;
        }
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        log::info!("session: stopped after {} frames", self.frame_number);
        self.state = SessionState::Stopped;
    }

    /// Close any open source, release the engine and enter `Released`.
    ///
    /// Safe to call in any state, any number of times.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::Released {
            return;
        }
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.engine = None;
        log::info!("session: released");
        self.state = SessionState::Released;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.backend.name())
            .field("provider", &self.provider.name())
            .field("state", &self.state)
            .field("frame_number", &self.frame_number)
            .field("frame_buffer", &self.frame_buffer)
            .finish()
    }
}
