use serde::{Deserialize, Serialize};

/// Configuration for opening a capture source.
///
/// Unset size and frame rate leave the device defaults in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    uri: String,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    buffer_count: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            uri: "/dev/video0".to_string(),
            width: None,
            height: None,
            fps: None,
            buffer_count: 4,
        }
    }
}

impl SourceConfig {
    /// Set the source URI (device path, file or stream URL).
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the number of driver buffers; at least one is always used.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count.max(1);
        self
    }

    // Getters
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count.max(1)
    }
}
