use async_trait::async_trait;
use crate::types::{EnrichedArticle, ProcessedArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Stores the candidates whose url is not known yet and returns how many
    /// were added. Novel articles go to the front, the last one on top.
    async fn add(&self, candidates: Vec<EnrichedArticle>) -> Result<usize>;

    /// Newest-first view of at most `limit` articles; `None` or `Some(0)` returns all.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<ProcessedArticle>>;
}
