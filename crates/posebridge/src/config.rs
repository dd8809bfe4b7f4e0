use crate::ConfigError;
use posebridge_infer::Device;
use posebridge_video::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default frame buffer capacity: 1280x720 RGB8.
pub const DEFAULT_FRAME_CAPACITY: usize = 1280 * 720 * 3;

/// Default wait for a frame before a step reports an empty result.
pub const DEFAULT_CAPTURE_TIMEOUT_MS: u64 = 1000;

/// Configuration for a [`crate::Session`].
///
/// All fields are optional in JSON; missing ones take their defaults.
/// The source URI in `source` is replaced by the one passed to `start`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    frame_capacity: usize,
    capture_timeout_ms: u64,
    frame_output: bool,
    min_keypoint_confidence: f32,
    device: Device,
    source: SourceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            capture_timeout_ms: DEFAULT_CAPTURE_TIMEOUT_MS,
            frame_output: true,
            min_keypoint_confidence: 0.0,
            device: Device::Cpu,
            source: SourceConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the frame buffer capacity in bytes.
    pub fn with_frame_capacity(mut self, bytes: usize) -> Self {
        self.frame_capacity = bytes;
        self
    }

    /// Set the largest frame the buffer must hold, in pixels and channels.
    ///
    /// A product that overflows `usize` leaves a zero capacity, which
    /// `validate` rejects.
    pub fn with_max_resolution(mut self, width: usize, height: usize, channels: usize) -> Self {
        self.frame_capacity = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(channels))
            .unwrap_or(0);
        self
    }

    /// Set the capture wait. Sub-millisecond timeouts round up to 1 ms.
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.capture_timeout_ms = if millis == 0 && !timeout.is_zero() {
            1
        } else {
            millis
        };
        self
    }

    /// Copy each frame into the session buffer (on by default).
    pub fn with_frame_output(mut self, enabled: bool) -> Self {
        self.frame_output = enabled;
        self
    }

    /// Drop keypoints reported with a lower confidence.
    pub fn with_min_keypoint_confidence(mut self, confidence: f32) -> Self {
        self.min_keypoint_confidence = confidence;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    // Getters
    pub fn frame_capacity(&self) -> usize {
        self.frame_capacity
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn frame_output(&self) -> bool {
        self.frame_output
    }

    pub fn min_keypoint_confidence(&self) -> f32 {
        self.min_keypoint_confidence
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_capacity == 0 {
            return Err(ConfigError::Invalid(
                "frame_capacity must be greater than zero".to_string(),
            ));
        }
        if self.capture_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "capture_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_keypoint_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_keypoint_confidence must be within [0, 1], got {}",
                self.min_keypoint_confidence
            )));
        }
        Ok(())
    }
}
