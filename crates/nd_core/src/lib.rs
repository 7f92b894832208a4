pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, InferenceError};
pub use models::InferenceModel;
pub use storage::ArticleStorage;
pub use types::{EnrichedArticle, ProcessedArticle, RawArticle};

pub type Result<T> = std::result::Result<T, Error>;
