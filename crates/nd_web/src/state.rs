use std::sync::Arc;
use nd_core::ArticleStorage;
use nd_ingest::Pipeline;

pub struct AppState {
    pub pipeline: Pipeline,
    pub storage: Arc<dyn ArticleStorage>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        let storage = pipeline.storage().clone();
        Self { pipeline, storage }
    }
}
