use std::path::Path;
use std::sync::Arc;
use nd_core::{ArticleStorage, Result};

pub mod backends;
pub mod set;

pub use backends::*;
pub use set::ArticleSet;

pub const DEFAULT_DATA_FILE: &str = "data/articles.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    /// In-memory list mirrored to a JSON file.
    Json,
    /// In-memory list only, lost on exit.
    Memory,
}

/// Opens the store selected by `kind`. `path` is only read by the JSON backend.
pub async fn create_storage(kind: StorageKind, path: &Path) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        StorageKind::Json => Ok(Arc::new(JsonFileStorage::open(path).await?)),
        StorageKind::Memory => Ok(Arc::new(InMemoryStorage::new())),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, ArticleSet, StorageKind};
}
