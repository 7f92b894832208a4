use std::sync::Arc;
use nd_core::{Error, InferenceModel, Result};
use crate::Config;

pub mod dummy;
pub mod huggingface;

pub use dummy::DummyModel;
pub use huggingface::HuggingFaceModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelKind {
    /// Hosted models behind the Hugging Face inference API.
    #[value(name = "huggingface")]
    HuggingFace,
    /// Offline stand-in, no credentials needed.
    Dummy,
}

pub fn create_model(kind: ModelKind, config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    match kind {
        ModelKind::HuggingFace => {
            let config = config.ok_or_else(|| {
                Error::Config("the huggingface model needs HF_TOKEN, CLF_REPO and SUM_REPO".to_string())
            })?;
            Ok(Arc::new(HuggingFaceModel::new(config)?))
        }
        ModelKind::Dummy => Ok(Arc::new(DummyModel::new())),
    }
}
