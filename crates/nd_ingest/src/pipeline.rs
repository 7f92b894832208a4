use std::sync::Arc;
use futures::stream::{self, StreamExt};
use nd_core::{ArticleStorage, EnrichedArticle, InferenceError, InferenceModel, RawArticle, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

/// Counts returned to whoever submitted a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub received: usize,
    pub stored: usize,
}

/// An article skipped because inference failed for it.
#[derive(Debug)]
pub struct IngestFailure {
    pub source: String,
    pub url: Url,
    pub error: InferenceError,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub report: IngestReport,
    pub failures: Vec<IngestFailure>,
}

/// Enriches raw articles through an [`InferenceModel`] and hands the results
/// to an [`ArticleStorage`].
pub struct Pipeline {
    inference: Arc<dyn InferenceModel>,
    storage: Arc<dyn ArticleStorage>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(inference: Arc<dyn InferenceModel>, storage: Arc<dyn ArticleStorage>) -> Self {
        Self {
            inference,
            storage,
            concurrency: 1,
        }
    }

    /// Lets up to `concurrency` articles wait on inference at once. Results
    /// still reach the store in input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn storage(&self) -> &Arc<dyn ArticleStorage> {
        &self.storage
    }

    pub fn inference(&self) -> &Arc<dyn InferenceModel> {
        &self.inference
    }

    /// Classifies title and body, summarizes the body.
    pub async fn enrich(&self, raw: &RawArticle) -> std::result::Result<EnrichedArticle, InferenceError> {
        debug!(url = %raw.url, "🤖 Enriching article");
        let category = self.inference.classify(&format!("{}\n{}", raw.title, raw.text)).await?;
        let summary = self.inference.summarize(&raw.text).await?;
        Ok(EnrichedArticle::new(raw.clone(), category, summary))
    }

    /// Enriches every article of `batch` independently and stores the ones
    /// that made it. Inference failures are logged and returned in
    /// [`IngestOutcome::failures`]; only a storage failure fails the call.
    pub async fn ingest(&self, batch: Vec<RawArticle>) -> Result<IngestOutcome> {
        let received = batch.len();

        let outcomes: Vec<_> = stream::iter(batch)
            .map(|raw| async move {
                let outcome = self.enrich(&raw).await;
                (raw, outcome)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut enriched = Vec::with_capacity(received);
        let mut failures = Vec::new();
        for (raw, outcome) in outcomes {
            match outcome {
                Ok(article) => enriched.push(article),
                Err(error) => {
                    warn!(source = %raw.source, url = %raw.url, error = %error, "🚫 Inference failed, skipping article");
                    failures.push(IngestFailure {
                        source: raw.source,
                        url: raw.url,
                        error,
                    });
                }
            }
        }

        let enriched_count = enriched.len();
        let stored = self.storage.add(enriched).await?;
        info!(
            received,
            enriched = enriched_count,
            stored,
            failed = failures.len(),
            "📥 Batch ingested"
        );

        Ok(IngestOutcome {
            report: IngestReport { received, stored },
            failures,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("inference", &self.inference.name())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
