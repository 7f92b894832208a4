use async_trait::async_trait;
use chrono::Utc;
use nd_core::{ArticleStorage, EnrichedArticle, ProcessedArticle, Result};
use tokio::sync::Mutex;
use crate::ArticleSet;

/// Same ordering and dedup rules as the file store, without the file.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    set: Mutex<ArticleSet>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn add(&self, candidates: Vec<EnrichedArticle>) -> Result<usize> {
        let mut set = self.set.lock().await;
        Ok(set.insert_novel(candidates, Utc::now()))
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<ProcessedArticle>> {
        let set = self.set.lock().await;
        Ok(set.newest(limit))
    }
}
