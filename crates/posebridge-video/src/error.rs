use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    Device(String),
    Stream(String),
    Format(String),
    Transfer(String),
    FrameSize { expected: usize, got: usize },
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Format(msg) => write!(f, "format error: {msg}"),
            VideoError::Transfer(msg) => write!(f, "device-to-host transfer error: {msg}"),
            VideoError::FrameSize { expected, got } => {
                write!(f, "frame size mismatch: expected {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}
