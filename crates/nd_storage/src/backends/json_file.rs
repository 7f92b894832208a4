use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::Utc;
use nd_core::{ArticleStorage, EnrichedArticle, Error, ProcessedArticle, Result};
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use crate::ArticleSet;

/// Article list held in memory and mirrored to a single JSON file.
///
/// The file is only read by [`JsonFileStorage::open`]. Every `add` that stores
/// something rewrites it through a sibling `.tmp` file and a rename, so the
/// previous version survives a crash at any point of the write. One mutex
/// covers the list and the write; reads wait for a write in progress.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    set: Mutex<ArticleSet>,
}

impl JsonFileStorage {
    /// Loads `path` if it exists, starts empty otherwise. A file that does not
    /// parse is an error; nothing is salvaged from it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let articles: Vec<ProcessedArticle> = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::Storage(format!("failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!("💾 Loaded {} articles from {}", articles.len(), path.display());
        Ok(Self {
            path,
            set: Mutex::new(ArticleSet::from_articles(articles)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Writes `articles` to the temp file and syncs it. The data file is untouched.
    async fn write_snapshot<T: Serialize + Sync>(&self, articles: &[T]) -> Result<PathBuf> {
        let tmp = self.temp_path();
        let json = serde_json::to_vec_pretty(articles)?;

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        Ok(tmp)
    }

    /// Moves a finished snapshot over the data file in one step.
    async fn commit(&self, tmp: &Path) -> Result<()> {
        fs::rename(tmp, &self.path).await?;
        Ok(())
    }

    /// Persists `fresh` on top of `current` without touching either.
    async fn persist(&self, fresh: &[ProcessedArticle], current: &[ProcessedArticle]) -> Result<()> {
        let articles: Vec<&ProcessedArticle> = fresh.iter().chain(current).collect();
        let tmp = self.write_snapshot(&articles).await?;
        self.commit(&tmp).await?;
        debug!("Persisted {} articles to {}", articles.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ArticleStorage for JsonFileStorage {
    async fn add(&self, candidates: Vec<EnrichedArticle>) -> Result<usize> {
        let mut set = self.set.lock().await;

        let fresh = set.novel(candidates, Utc::now());
        let added = fresh.len();
        if added > 0 {
            // Memory only moves forward once the file has.
            self.persist(&fresh, set.as_slice()).await?;
            set.prepend(fresh);
        }
        Ok(added)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<ProcessedArticle>> {
        let set = self.set.lock().await;
        Ok(set.newest(limit))
    }
}
