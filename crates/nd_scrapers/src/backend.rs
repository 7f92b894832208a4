use std::time::Duration;
use reqwest::Client;
use nd_core::{Error, RawArticle, Result};
use nd_ingest::IngestReport;
use tracing::info;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts scraped batches to a running `newsdesk serve`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(SUBMIT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn ingest_url(&self) -> String {
        format!("{}/ingest", self.base_url.trim_end_matches('/'))
    }

    pub async fn submit(&self, articles: &[RawArticle]) -> Result<IngestReport> {
        let url = self.ingest_url();
        let response = self
            .client
            .post(&url)
            .json(articles)
            .send()
            .await?
            .error_for_status()?;
        let report: IngestReport = response
            .json()
            .await
            .map_err(|e| Error::Scraping(format!("Unexpected reply from {}: {}", url, e)))?;
        info!("✅ Sent {} articles → {} ({} stored)", articles.len(), url, report.stored);
        Ok(report)
    }
}
