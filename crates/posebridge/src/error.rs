use crate::SessionState;
use posebridge_infer::InferError;
use posebridge_video::VideoError;
use std::fmt;

/// Status codes surfaced across the C ABI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseStatus {
    Ok = 0,
    ModelLoadFailed = 1,
    SourceOpenFailed = 2,
    InvalidState = 3,
    CaptureFailed = 4,
    InferenceFailed = 5,
    FrameTooLarge = 6,
    InvalidArgument = 7,
    Internal = 8,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {msg}"),
            ConfigError::Parse(msg) => write!(f, "cannot parse config: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[derive(Debug)]
pub enum PoseError {
    ModelLoad(InferError),
    SourceOpen(VideoError),
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    /// The source stopped streaming, or a frame could not be read back.
    Capture(String),
    Inference(InferError),
    FrameTooLarge { frame_bytes: usize, capacity: usize },
    InvalidArgument(String),
    Config(ConfigError),
}

impl PoseError {
    pub fn status(&self) -> PoseStatus {
        match self {
            PoseError::ModelLoad(_) => PoseStatus::ModelLoadFailed,
            PoseError::SourceOpen(_) => PoseStatus::SourceOpenFailed,
            PoseError::InvalidState { .. } => PoseStatus::InvalidState,
            PoseError::Capture(_) => PoseStatus::CaptureFailed,
            PoseError::Inference(_) => PoseStatus::InferenceFailed,
            PoseError::FrameTooLarge { .. } => PoseStatus::FrameTooLarge,
            PoseError::InvalidArgument(_) | PoseError::Config(_) => PoseStatus::InvalidArgument,
        }
    }
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::ModelLoad(err) => write!(f, "model load failed: {err}"),
            PoseError::SourceOpen(err) => write!(f, "source open failed: {err}"),
            PoseError::InvalidState { operation, state } => {
                write!(f, "{operation} is not allowed in state {state:?}")
            }
            PoseError::Capture(msg) => write!(f, "capture failed: {msg}"),
            PoseError::Inference(err) => write!(f, "inference failed: {err}"),
            PoseError::FrameTooLarge {
                frame_bytes,
                capacity,
            } => write!(
                f,
                "frame of {frame_bytes} bytes exceeds buffer capacity of {capacity} bytes"
            ),
            PoseError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            PoseError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PoseError {}

impl From<ConfigError> for PoseError {
    fn from(err: ConfigError) -> Self {
        PoseError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(PoseStatus::Ok as i32, 0);
        assert_eq!(PoseStatus::ModelLoadFailed as i32, 1);
        assert_eq!(PoseStatus::SourceOpenFailed as i32, 2);
        assert_eq!(PoseStatus::InvalidState as i32, 3);
        assert_eq!(PoseStatus::CaptureFailed as i32, 4);
        assert_eq!(PoseStatus::InferenceFailed as i32, 5);
        assert_eq!(PoseStatus::FrameTooLarge as i32, 6);
        assert_eq!(PoseStatus::InvalidArgument as i32, 7);
        assert_eq!(PoseStatus::Internal as i32, 8);
    }

    #[test]
    fn test_error_status_mapping() {
        let err = PoseError::InvalidState {
            operation: "step",
            state: SessionState::Ready,
        };
        assert_eq!(err.status(), PoseStatus::InvalidState);
        assert!(err.to_string().contains("step"));
        assert!(err.to_string().contains("Ready"));

        let err = PoseError::Config(ConfigError::Invalid("zero capacity".to_string()));
        assert_eq!(err.status(), PoseStatus::InvalidArgument);

        let err = PoseError::FrameTooLarge {
            frame_bytes: 10,
            capacity: 4,
        };
        assert_eq!(err.status(), PoseStatus::FrameTooLarge);
        assert!(err.to_string().contains("10 bytes"));
    }
}
