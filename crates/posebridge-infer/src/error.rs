use crate::Device;
use std::fmt;

#[derive(Debug)]
pub enum InferError {
    ModelNotFound(String),
    Model(String),
    UnsupportedDevice(Device),
    ShapeMismatch { expected: String, got: String },
    Runtime(String),
    Io(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelNotFound(path) => write!(f, "model file not found: {path}"),
            InferError::Model(msg) => write!(f, "model error: {msg}"),
            InferError::UnsupportedDevice(device) => write!(f, "unsupported device: {device}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}
