use crate::InferError;
use std::path::{Path, PathBuf};

/// The network file plus any vendor side files (keypoint topology, colors, ...).
///
/// Auxiliary paths are kept in the order the caller gave them; their meaning
/// is up to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPaths {
    model: PathBuf,
    aux: Vec<PathBuf>,
}

impl ModelPaths {
    pub fn new(model: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            aux: Vec::new(),
        }
    }

    pub fn with_aux(mut self, path: impl Into<PathBuf>) -> Self {
        self.aux.push(path.into());
        self
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    pub fn aux(&self) -> &[PathBuf] {
        &self.aux
    }

    /// Check that the model and every auxiliary file exist on disk.
    ///
    /// For backends that read files themselves; backends resolving built-in
    /// model names skip this.
    pub fn ensure_exist(&self) -> Result<(), InferError> {
        std::iter::once(&self.model)
            .chain(self.aux.iter())
            .find(|path| !path.is_file())
            .map_or(Ok(()), |missing| {
                Err(InferError::ModelNotFound(missing.display().to_string()))
            })
    }
}
