use crate::{Device, InferError, ModelPaths, PoseEngine};

/// Vendor SDK entry point: builds a ready-to-run engine from model files.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;
    fn load_model(
        &self,
        model: &ModelPaths,
        device: &Device,
    ) -> Result<Box<dyn PoseEngine>, InferError>;
}
